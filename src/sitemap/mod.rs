// src/sitemap/mod.rs
// =============================================================================
// This module discovers the pages to check.
//
// Currently implements:
// - Fetching a sitemap over HTTP(S)
// - Extracting <url><loc> entries, sitemaps.org namespace first,
//   any namespace as a fallback
//
// A sitemap that cannot be fetched or parsed stops the whole crawl, so the
// error type here is returned to the caller instead of being recorded.
// =============================================================================

mod fetch;

// Re-export the public API from fetch.rs
pub use fetch::fetch_sitemap_urls;
