// src/checker/html.rs
// =============================================================================
// This module pulls link targets, image sources and the page title out of
// raw HTML.
//
// We deliberately do NOT build a DOM here. Regular expressions over the raw
// markup are enough for double-quoted href/src attributes and they tolerate
// broken or truncated pages. The trade-off: attributes written with single
// quotes, split across script-generated markup, etc. are not seen.
//
// Rust concepts:
// - LazyLock: compile each regex once, on first use
// - Iterators: captures_iter + filter + map + collect
// =============================================================================

use regex::Regex;
use std::sync::LazyLock;

/// Returned by `extract_title` when the page has no <title> element
pub const NO_TITLE: &str = "No title found";

// (?i) = case-insensitive, (?s) = `.` also matches newlines
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s+(?:[^>]*?\s+)?href="([^"]*)""#)
        .expect("LINK_RE: hardcoded regex is valid")
});

static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<img\s+(?:[^>]*?\s+)?src="([^"]*)""#)
        .expect("IMAGE_RE: hardcoded regex is valid")
});

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<title>(.*?)</title>").expect("TITLE_RE: hardcoded regex is valid")
});

// Extracts every anchor href from the markup, in document order
//
// Skipped:
// - empty values
// - fragment-only links ("#top")
// - script pseudo-links ("javascript:void(0)")
//
// Duplicates are kept; the page analyzer deduplicates later.
pub fn extract_links(html: &str) -> Vec<String> {
    capture_values(&LINK_RE, html)
        .filter(|href| !href.starts_with('#') && !href.starts_with("javascript:"))
        .collect()
}

// Extracts every <img> src from the markup, in document order
//
// Inline "data:" images are skipped because there is nothing to fetch.
pub fn extract_images(html: &str) -> Vec<String> {
    capture_values(&IMAGE_RE, html)
        .filter(|src| !src.starts_with("data:"))
        .collect()
}

// Returns the trimmed text of the first <title> element, or NO_TITLE
pub fn extract_title(html: &str) -> String {
    TITLE_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| NO_TITLE.to_string())
}

// Yields the trimmed, non-empty first capture group of every match
fn capture_values<'a>(re: &'a Regex, html: &'a str) -> impl Iterator<Item = String> + 'a {
    re.captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
