// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - sitemap: crawl the first N pages of a sitemap and report issues
// - page:    check a single page (handy when a report flags one)
//
// Rust concepts:
// - Derive macros: clap generates the parser from these types
// - Enums: one variant per subcommand
// =============================================================================

use crate::config::{DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_LINKS, DEFAULT_PAGE_LIMIT};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sitemap-guardian",
    version,
    about = "Walks a website's sitemap and reports broken links and missing images",
    long_about = "sitemap-guardian reads a sitemap, fetches each listed page and checks \
                  that its links and images still resolve. Pages with problems end up \
                  in a timestamped issues report."
)]
pub struct Cli {
    /// Show debug output (probe results, resolved URLs)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a sitemap and check every listed page
    ///
    /// Example: sitemap-guardian sitemap https://example.com/sitemap.xml --limit 15
    Sitemap {
        /// Sitemap URL (e.g., https://example.com/sitemap.xml)
        sitemap_url: String,

        /// Check at most this many pages, taken from the start of the sitemap
        #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
        limit: usize,

        /// Page URL to skip (repeatable)
        #[arg(long = "ignore", value_name = "URL")]
        ignore: Vec<String>,

        /// File with page URLs to skip, one per line ('#' starts a comment)
        #[arg(long, value_name = "PATH")]
        ignore_file: Option<PathBuf>,

        /// Directory the issues report is written to
        #[arg(long, value_name = "DIR", default_value = ".")]
        report_dir: PathBuf,

        /// Do not write an issues report file
        #[arg(long)]
        no_report: bool,

        #[command(flatten)]
        check: CheckArgs,
    },

    /// Check a single page
    ///
    /// Example: sitemap-guardian page https://example.com/about/
    Page {
        /// Page URL to check
        page_url: String,

        #[command(flatten)]
        check: CheckArgs,
    },
}

// Options shared by both subcommands
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Probe at most this many distinct links per page
    #[arg(long, default_value_t = DEFAULT_MAX_LINKS)]
    pub max_links: usize,

    /// Timeout in seconds for fetching the sitemap and each page
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Output results as JSON instead of text
    #[arg(long)]
    pub json: bool,
}
