// src/checker/http.rs
// =============================================================================
// This module talks HTTP for the checker.
//
// Key functionality:
// - Builds the one shared client (identifying User-Agent, redirect limit)
// - Fetches a page's HTML with GET (a failure here fails that page)
// - Probes a link/image with HEAD (a failure here only marks that resource)
//
// Every probe ends in a concrete status code, even when no response came
// back:
// - got a response            -> the response's own status
// - transport failure         -> 404 Not Found
// - anything else (bad URL,
//   unsupported scheme, timeout) -> 400 Bad Request
//
// Only 200 OK counts as valid.
//
// Rust concepts:
// - async/await: each request is awaited before the next one starts
// - Result<T, E>: for page fetches, which the caller records as an issue
// =============================================================================

use crate::error::PageFetchError;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// User-Agent sent with every request; some servers reject anonymous clients
pub const USER_AGENT: &str = concat!("sitemap-guardian/", env!("CARGO_PKG_VERSION"));

/// Timeout for a single HEAD probe
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

// Status recorded when the request never produced a response
const TRANSPORT_FAILURE: StatusCode = StatusCode::NOT_FOUND;
const OTHER_FAILURE: StatusCode = StatusCode::BAD_REQUEST;

// Result of probing a single resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// The absolute URL that was probed
    pub url: String,
    /// HTTP status code (real or sentinel)
    pub status: u16,
    /// True only for 200 OK
    pub valid: bool,
}

impl ProbeResult {
    pub fn new(url: String, status: StatusCode) -> Self {
        Self {
            url,
            status: status.as_u16(),
            valid: status == StatusCode::OK,
        }
    }

    /// "404 Not Found" style text for reports
    pub fn status_text(&self) -> String {
        match StatusCode::from_u16(self.status) {
            Ok(code) => match code.canonical_reason() {
                Some(reason) => format!("{} {}", self.status, reason),
                None => self.status.to_string(),
            },
            Err(_) => self.status.to_string(),
        }
    }
}

// Builds the HTTP client shared by every request in a run
//
// Timeouts are set per request (probes and page fetches differ), so the
// client itself only carries the User-Agent and redirect policy.
pub fn build_client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
}

// Fetches a page and returns its HTML
//
// Any non-2xx status is an error for the page.
pub async fn fetch_html(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<String, PageFetchError> {
    let request_error = |source| PageFetchError::Request {
        url: url.to_string(),
        source,
    };

    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(request_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(PageFetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    response.text().await.map_err(request_error)
}

// Checks that a resource exists with a single HEAD request
//
// Never fails: errors are folded into the status code (see top of file).
pub async fn probe(client: &Client, url: &str, timeout: Duration) -> ProbeResult {
    let status = match client.head(url).timeout(timeout).send().await {
        Ok(response) => response.status(),
        Err(e) => {
            let status = classify_error(&e);
            tracing::debug!("probe {} failed ({}): {}", url, status.as_u16(), e);
            status
        }
    };

    ProbeResult::new(url.to_string(), status)
}

// Maps a reqwest error onto one of the two sentinel statuses
fn classify_error(error: &reqwest::Error) -> StatusCode {
    if error.is_builder() || error.is_timeout() {
        OTHER_FAILURE
    } else if error.is_connect()
        || error.is_request()
        || error.is_redirect()
        || error.is_body()
        || error.is_decode()
    {
        TRANSPORT_FAILURE
    } else {
        OTHER_FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_only_200_is_valid() {
        assert!(ProbeResult::new("u".to_string(), StatusCode::OK).valid);
        assert!(!ProbeResult::new("u".to_string(), StatusCode::NO_CONTENT).valid);
        assert!(!ProbeResult::new("u".to_string(), StatusCode::NOT_FOUND).valid);
    }

    #[test]
    fn test_status_text() {
        let result = ProbeResult::new("u".to_string(), StatusCode::NOT_FOUND);
        assert_eq!(result.status_text(), "404 Not Found");
    }

    #[tokio::test]
    async fn test_probe_ok_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/ok"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = build_client().unwrap();
        let url = format!("{}/ok", server.uri());
        let result = probe(&client, &url, PROBE_TIMEOUT).await;

        assert_eq!(result.url, url);
        assert_eq!(result.status, 200);
        assert!(result.valid);
    }

    #[tokio::test]
    async fn test_probe_records_error_status_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/boom"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = build_client().unwrap();
        let result = probe(&client, &format!("{}/boom", server.uri()), PROBE_TIMEOUT).await;

        assert_eq!(result.status, 503);
        assert!(!result.valid);
    }

    #[tokio::test]
    async fn test_probe_connection_refused_is_not_found() {
        // Bind then drop a listener so the port is (very likely) closed
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = build_client().unwrap();
        let result = probe(&client, &format!("http://127.0.0.1:{}/", port), PROBE_TIMEOUT).await;

        assert_eq!(result.status, 404);
        assert!(!result.valid);
    }

    #[tokio::test]
    async fn test_probe_timeout_is_bad_request() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let client = build_client().unwrap();
        let url = format!("{}/slow", server.uri());
        let result = probe(&client, &url, Duration::from_millis(200)).await;

        assert_eq!(result.status, 400);
        assert!(!result.valid);
    }

    #[tokio::test]
    async fn test_probe_malformed_url_is_bad_request() {
        let client = build_client().unwrap();
        let result = probe(&client, "not a url", PROBE_TIMEOUT).await;

        assert_eq!(result.url, "not a url");
        assert_eq!(result.status, 400);
        assert!(!result.valid);
    }

    #[tokio::test]
    async fn test_probe_unsupported_scheme_is_bad_request() {
        let client = build_client().unwrap();
        let result = probe(&client, "mailto:someone@example.com", PROBE_TIMEOUT).await;

        assert_eq!(result.status, 400);
    }

    #[tokio::test]
    async fn test_fetch_html_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<title>Hi</title>"))
            .mount(&server)
            .await;

        let client = build_client().unwrap();
        let html = fetch_html(&client, &format!("{}/page", server.uri()), PROBE_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(html, "<title>Hi</title>");
    }

    #[tokio::test]
    async fn test_fetch_html_non_success_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_client().unwrap();
        let err = fetch_html(&client, &format!("{}/missing", server.uri()), PROBE_TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PageFetchError::Status { status: StatusCode::NOT_FOUND, .. }
        ));
    }
}
