// src/checker/mod.rs
// =============================================================================
// This module contains the per-resource building blocks.
//
// Submodules:
// - html: Extracts link hrefs, image srcs and the title from raw HTML
// - resolve: Turns those references into absolute URLs
// - http: Fetches pages and probes resources
//
// Nothing here knows about sitemaps or crawl bookkeeping; that lives in
// crawl/.
// =============================================================================

mod html;
mod http;
mod resolve;

pub use html::{extract_images, extract_links, extract_title};
pub use http::{build_client, fetch_html, probe, ProbeResult, PROBE_TIMEOUT};
pub use resolve::resolve_url;
