// src/crawl/run.rs
// =============================================================================
// This module walks the sitemap and folds page reports into a summary.
//
// How it works:
// 1. Fetch the sitemap (the only error that stops the crawl)
// 2. Take the first `page_limit` URLs
// 3. For each URL in order:
//    - on the ignore list -> remember it as skipped, nothing else
//    - otherwise          -> analyze the page and fold the report in
// 4. Return the summary, even if every page failed
//
// Only pages with issues keep their report; clean pages just bump
// `success_count`.
//
// Rust concepts:
// - StreamExt::fold: an async fold that awaits each step before starting
//   the next, so there is never more than one request in flight
// =============================================================================

use super::page::{analyze_page, PageReport};
use crate::config::CrawlConfig;
use crate::error::SitemapFetchError;
use crate::sitemap;
// stream::iter + fold gives a strictly sequential walk with an accumulator
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};

// Outcome of a whole crawl
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlSummary {
    pub sitemap_url: String,
    /// URLs the sitemap declared
    pub total_urls: usize,
    /// URLs considered after the page limit
    pub planned: usize,
    /// Pages actually analyzed (ignored pages are not counted)
    pub processed_count: usize,
    pub success_count: usize,
    pub issues_count: usize,
    /// Ignored URLs, in sitemap order
    pub skipped: Vec<String>,
    /// Reports of the pages that had issues, in sitemap order
    pub reports: Vec<PageReport>,
}

impl CrawlSummary {
    fn new(sitemap_url: &str, total_urls: usize, planned: usize) -> Self {
        Self {
            sitemap_url: sitemap_url.to_string(),
            total_urls,
            planned,
            ..Self::default()
        }
    }

    /// Folds one analyzed page into the summary
    pub fn record(mut self, report: PageReport) -> Self {
        self.processed_count += 1;
        if report.has_issues {
            self.issues_count += 1;
            self.reports.push(report);
        } else {
            self.success_count += 1;
        }
        self
    }

    /// Notes an ignored page without analyzing it
    pub fn skip(mut self, page_url: String) -> Self {
        self.skipped.push(page_url);
        self
    }

    pub fn has_issues(&self) -> bool {
        self.issues_count > 0
    }
}

// Runs a full crawl
//
// Returns Err only when the sitemap itself cannot be read.
pub async fn run_crawl(
    client: &Client,
    config: &CrawlConfig,
) -> Result<CrawlSummary, SitemapFetchError> {
    // Step 1: Read the sitemap. This is the only failure that ends the crawl.
    let urls =
        sitemap::fetch_sitemap_urls(client, &config.sitemap_url, config.settings.fetch_timeout)
            .await?;

    // Step 2: Work out how many pages we will actually visit
    let planned = config.page_limit.min(urls.len());
    tracing::info!(
        "Found {} URLs in sitemap, checking the first {}",
        urls.len(),
        planned
    );

    // Step 3: Walk the pages in sitemap order, folding each result into the
    // summary. fold awaits each page before starting the next.
    let initial = CrawlSummary::new(&config.sitemap_url, urls.len(), planned);

    let summary = stream::iter(urls.into_iter().take(planned).enumerate())
        .fold(initial, move |summary, (index, page_url)| async move {
            let position = index + 1; // 1-based for the report

            // Ignored pages are listed but never fetched
            if config.ignore.contains(&page_url) {
                tracing::info!("[{}/{}] Skipping ignored URL: {}", position, planned, page_url);
                return summary.skip(page_url);
            }

            tracing::info!("[{}/{}] Analyzing: {}", position, planned, page_url);
            let report = analyze_page(client, &page_url, position, &config.settings).await;

            if report.has_issues {
                tracing::warn!(
                    "{}: {} broken link(s), {} missing image(s){}",
                    page_url,
                    report.broken_links.len(),
                    report.missing_images.len(),
                    if report.error_message.is_some() { ", page error" } else { "" }
                );
            }

            summary.record(report)
        })
        .await;

    tracing::info!(
        "Processed {} page(s): {} passed, {} with issues",
        summary.processed_count,
        summary.success_count,
        summary.issues_count
    );

    Ok(summary)
}
