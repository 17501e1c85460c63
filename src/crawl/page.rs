// src/crawl/page.rs
// =============================================================================
// This module checks one page.
//
// How it works:
// 1. GET the page (failure is recorded on the report, never returned)
// 2. Pull out the title, link hrefs and image srcs
// 3. Deduplicate each list, keeping first occurrences in order
// 4. Keep only the first N distinct links (images are not capped)
// 5. Resolve every reference against the page URL
// 6. Probe links, then images, one request at a time
// 7. Keep the failures on the report
//
// Rust concepts:
// - HashSet::insert returns false for values already seen, which makes an
//   order-preserving dedup a one-line filter
// =============================================================================

use crate::checker::{self, ProbeResult}; // Extraction, resolution and probing
use crate::config::CheckSettings; // Caps and timeouts for this page
use reqwest::Client; // Shared HTTP client, passed in by reference
use serde::{Deserialize, Serialize}; // So --json can print reports
use std::collections::HashSet; // Seen-set for dedup

// Everything we learned about one page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageReport {
    /// 1-based position within the crawled slice of the sitemap
    pub position: usize,
    pub page_url: String,
    /// None when the page could not be fetched
    pub title: Option<String>,
    /// Bytes of HTML received
    pub content_length: Option<usize>,
    /// Links probed (after dedup and cap)
    pub total_links: usize,
    pub broken_links: Vec<ProbeResult>,
    /// Images probed (after dedup)
    pub total_images: usize,
    pub missing_images: Vec<ProbeResult>,
    pub has_issues: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl PageReport {
    // Report for a page whose analysis failed before any probing
    fn failed(position: usize, page_url: &str, message: String) -> Self {
        Self {
            position,
            page_url: page_url.to_string(),
            title: None,
            content_length: None,
            total_links: 0,
            broken_links: Vec::new(),
            total_images: 0,
            missing_images: Vec::new(),
            has_issues: true,
            error_message: Some(message),
        }
    }
}

// Analyzes one page and always returns a report
//
// `position` is carried through for reporting only.
pub async fn analyze_page(
    client: &Client,
    page_url: &str,
    position: usize,
    settings: &CheckSettings,
) -> PageReport {
    // Step 1: Fetch the HTML. A failed fetch is the page's only issue.
    let html = match checker::fetch_html(client, page_url, settings.fetch_timeout).await {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!("Error analyzing {}: {}", page_url, e);
            return PageReport::failed(position, page_url, e.to_string());
        }
    };

    tracing::debug!("fetched {} bytes of HTML from {}", html.len(), page_url);

    // Step 2: Pull out the title and the raw references
    let title = checker::extract_title(&html);

    // Step 3: Dedup both lists; only links are capped
    let links: Vec<String> = dedup(checker::extract_links(&html))
        .into_iter()
        .take(settings.max_links_per_page)
        .collect();
    let images = dedup(checker::extract_images(&html));

    tracing::info!(
        "checking {} link(s) and {} image(s) on {}",
        links.len(),
        images.len(),
        page_url
    );

    // Step 4: Probe links first, then images, one request at a time
    let link_results = probe_all(client, page_url, &links, settings).await;
    let image_results = probe_all(client, page_url, &images, settings).await;

    // Step 5: Anything that is not 200 OK is an issue
    let broken_links: Vec<ProbeResult> = link_results.into_iter().filter(|r| !r.valid).collect();
    let missing_images: Vec<ProbeResult> =
        image_results.into_iter().filter(|r| !r.valid).collect();

    let has_issues = !broken_links.is_empty() || !missing_images.is_empty();

    PageReport {
        position,
        page_url: page_url.to_string(),
        title: Some(title),
        content_length: Some(html.len()),
        total_links: links.len(),
        broken_links,
        total_images: images.len(),
        missing_images,
        has_issues,
        error_message: None,
    }
}

// Resolves and probes each reference in order, one at a time
async fn probe_all(
    client: &Client,
    page_url: &str,
    references: &[String],
    settings: &CheckSettings,
) -> Vec<ProbeResult> {
    let mut results = Vec::with_capacity(references.len());

    for reference in references {
        let url = checker::resolve_url(page_url, reference);
        let result = checker::probe(client, &url, settings.probe_timeout).await;
        if !result.valid {
            tracing::debug!("{} -> {}", result.url, result.status);
        }
        results.push(result);
    }

    results
}

// Drops repeated values, keeping the first occurrence of each
fn dedup(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_dedup_keeps_first_occurrence_order() {
        let values = vec!["b", "a", "b", "c", "a"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(dedup(values), vec!["b", "a", "c"]);
    }

    async fn mount_page(server: &MockServer, page: &str, html: String) {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .mount(server)
            .await;
    }

    async fn mount_head(server: &MockServer, resource: &str, status: u16) {
        Mock::given(method("HEAD"))
            .and(path(resource))
            .respond_with(ResponseTemplate::new(status))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_clean_page_has_no_issues() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            "/post",
            r##"<html><head><title> Hello </title></head><body>
                <a href="ok">ok</a>
                <a href="ok">ok again</a>
                <a href="#top">top</a>
                <img src="pic.png">
            </body></html>"##
                .to_string(),
        )
        .await;
        mount_head(&server, "/post/ok", 200).await;
        mount_head(&server, "/post/pic.png", 200).await;

        let client = checker::build_client().unwrap();
        let page_url = format!("{}/post", server.uri());
        let report = analyze_page(&client, &page_url, 1, &CheckSettings::default()).await;

        assert_eq!(report.title.as_deref(), Some("Hello"));
        assert_eq!(report.total_links, 1);
        assert_eq!(report.total_images, 1);
        assert!(report.broken_links.is_empty());
        assert!(report.missing_images.is_empty());
        assert!(!report.has_issues);
        assert!(report.error_message.is_none());
        assert!(report.content_length.unwrap() > 0);
    }

    #[tokio::test]
    async fn test_broken_link_and_missing_image_are_reported() {
        let server = MockServer::start().await;
        let base = server.uri();
        mount_page(
            &server,
            "/post/",
            format!(
                r#"<a href="{base}/alive">a</a>
                   <a href="/dead">d</a>
                   <img src="/missing.png">
                   <img src="data:image/gif;base64,R0lGOD">"#
            ),
        )
        .await;
        mount_head(&server, "/alive", 200).await;
        mount_head(&server, "/dead", 404).await;
        mount_head(&server, "/missing.png", 410).await;

        let client = checker::build_client().unwrap();
        let page_url = format!("{}/post/", base);
        let report = analyze_page(&client, &page_url, 3, &CheckSettings::default()).await;

        assert_eq!(report.position, 3);
        assert_eq!(report.title.as_deref(), Some("No title found"));
        assert_eq!(report.total_links, 2);
        assert_eq!(report.broken_links.len(), 1);
        assert_eq!(report.broken_links[0].url, format!("{}/dead", base));
        assert_eq!(report.broken_links[0].status, 404);
        assert_eq!(report.total_images, 1);
        assert_eq!(report.missing_images[0].status, 410);
        assert!(report.has_issues);
    }

    #[tokio::test]
    async fn test_links_are_capped_but_images_are_not() {
        let server = MockServer::start().await;
        let mut html = String::new();
        for i in 0..5 {
            html.push_str(&format!(r#"<a href="/l{i}">l</a><img src="/i{i}.png">"#));
        }
        mount_page(&server, "/many", html).await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let settings = CheckSettings {
            max_links_per_page: 2,
            ..CheckSettings::default()
        };
        let client = checker::build_client().unwrap();
        let report = analyze_page(&client, &format!("{}/many", server.uri()), 1, &settings).await;

        assert_eq!(report.total_links, 2);
        assert_eq!(report.total_images, 5);
        assert!(!report.has_issues);
    }

    #[tokio::test]
    async fn test_fetch_failure_becomes_error_report() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = checker::build_client().unwrap();
        let page_url = format!("{}/broken", server.uri());
        let report = analyze_page(&client, &page_url, 1, &CheckSettings::default()).await;

        assert!(report.has_issues);
        assert!(report.title.is_none());
        assert!(report.content_length.is_none());
        assert!(report.error_message.unwrap().contains("500"));
    }
}
