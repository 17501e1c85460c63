// src/crawl/mod.rs
// =============================================================================
// This module drives the sitemap crawl.
//
// Features:
// - Bounded walk over the sitemap's page list (first N entries)
// - Ignore list for known-problematic pages
// - Per-page analysis: title, broken links, missing images
// - A summary that keeps detail only for pages with issues
//
// Everything runs one request at a time; there is no worker pool.
// =============================================================================

mod page;
mod run;

pub use page::{analyze_page, PageReport};
pub use run::{run_crawl, CrawlSummary};
