// src/config.rs
// =============================================================================
// Run settings for a crawl.
//
// There is no config file and no environment lookup: everything comes from
// the command line (see cli.rs). The only file we ever read is an optional
// ignore list, one URL per line.
// =============================================================================

use crate::checker::PROBE_TIMEOUT;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_PAGE_LIMIT: usize = 30;
pub const DEFAULT_MAX_LINKS: usize = 20;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

// Limits shared by the single-page and full-crawl modes
#[derive(Debug, Clone)]
pub struct CheckSettings {
    /// Distinct links probed per page (images are never capped)
    pub max_links_per_page: usize,
    /// Timeout for each HEAD probe
    pub probe_timeout: Duration,
    /// Timeout for the sitemap GET and each page GET
    pub fetch_timeout: Duration,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            max_links_per_page: DEFAULT_MAX_LINKS,
            probe_timeout: PROBE_TIMEOUT,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

// Everything run_crawl needs
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub sitemap_url: String,
    /// Only the first `page_limit` sitemap entries are considered
    pub page_limit: usize,
    /// Page URLs to skip without analysis
    pub ignore: HashSet<String>,
    pub settings: CheckSettings,
}

impl CrawlConfig {
    pub fn new(sitemap_url: impl Into<String>) -> Self {
        Self {
            sitemap_url: sitemap_url.into(),
            page_limit: DEFAULT_PAGE_LIMIT,
            ignore: HashSet::new(),
            settings: CheckSettings::default(),
        }
    }
}

// Reads an ignore list file
//
// Format: one URL per line; blank lines and lines starting with '#' are
// skipped; surrounding whitespace is trimmed.
pub fn load_ignore_file(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read ignore file {}", path.display()))?;

    Ok(parse_ignore_list(&contents))
}

fn parse_ignore_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
