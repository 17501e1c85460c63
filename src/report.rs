// src/report.rs
// =============================================================================
// Turns a CrawlSummary into the issues report and writes it to disk.
//
// Layout:
// - header: title, timestamp, sitemap URL, '=' rule
// - one section per page with issues, separated by '-' rules
// - summary block with processed / passed / issue counts
//
// A report file is only written when there is something to report (issues
// found, or the crawl aborted). The caller decides; this module just renders
// and writes.
// =============================================================================

use crate::checker::ProbeResult;
use crate::crawl::{CrawlSummary, PageReport};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};

const RULE_WIDTH: usize = 80;

// Writing into a String never fails; the fmt::Result is only there so the
// helpers below can use `?` with writeln!
const STRING_WRITE: &str = "writing to a String cannot fail";

// Renders the full issues report for a finished crawl
pub fn render_report(summary: &CrawlSummary, generated_at: DateTime<Local>) -> String {
    let mut out = String::new();
    write_report_body(&mut out, summary, generated_at).expect(STRING_WRITE);
    out
}

// Renders the report for a crawl that never got past the sitemap
pub fn render_error_report(
    sitemap_url: &str,
    error: &dyn std::error::Error,
    generated_at: DateTime<Local>,
) -> String {
    let mut out = String::new();
    write_header(&mut out, sitemap_url, generated_at)
        .and_then(|_| writeln!(out, "Error: {}", error))
        .expect(STRING_WRITE);
    out
}

// JSON shape printed instead of a summary when the sitemap cannot be read
pub fn error_json(sitemap_url: &str, error: &dyn std::error::Error) -> serde_json::Value {
    serde_json::json!({
        "sitemap_url": sitemap_url,
        "error": error.to_string(),
    })
}

// Renders one page's section (also used by the single-page command)
pub fn render_page(report: &PageReport, planned: usize) -> String {
    let mut out = String::new();
    write_page(&mut out, report, planned).expect(STRING_WRITE);
    out
}

fn write_report_body(
    out: &mut String,
    summary: &CrawlSummary,
    generated_at: DateTime<Local>,
) -> fmt::Result {
    write_header(out, &summary.sitemap_url, generated_at)?;

    writeln!(out, "Found {} URLs in sitemap", summary.total_urls)?;
    writeln!(out)?;

    // Ignored pages are listed once, before the page sections
    for url in &summary.skipped {
        writeln!(out, "Skipping ignored URL: {}", url)?;
    }
    if !summary.skipped.is_empty() {
        writeln!(out)?;
    }

    // Only pages with issues made it into `reports`
    for report in &summary.reports {
        write_page(out, report, summary.planned)?;
        writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
        writeln!(out)?;
    }

    writeln!(out, "ANALYSIS SUMMARY:")?;
    writeln!(out, "Processed {} URLs from sitemap", summary.processed_count)?;
    writeln!(out, "✓ {} URLs passed all checks", summary.success_count)?;
    writeln!(out, "⚠ {} URLs have issues that should be addressed", summary.issues_count)
}

fn write_page(out: &mut String, report: &PageReport, planned: usize) -> fmt::Result {
    writeln!(
        out,
        "[{}/{}] Analyzing: {}",
        report.position, planned, report.page_url
    )?;

    // A page that failed to load has nothing else worth printing
    if let Some(error) = &report.error_message {
        return writeln!(out, "Error analyzing {}: {}", report.page_url, error);
    }

    if let Some(length) = report.content_length {
        writeln!(out, "Successfully fetched {} bytes of HTML", length)?;
    }
    if let Some(title) = &report.title {
        writeln!(out, "Title: {}", title)?;
    }

    write_resources(out, &report.broken_links, report.total_links, "broken links", "links")?;
    write_resources(out, &report.missing_images, report.total_images, "missing images", "images")?;

    if report.has_issues {
        writeln!(out, "⚠ This page has issues that should be addressed")
    } else {
        writeln!(out, "✓ This page passes all checks")
    }
}

fn write_resources(
    out: &mut String,
    failures: &[ProbeResult],
    total: usize,
    failure_label: &str,
    total_label: &str,
) -> fmt::Result {
    if failures.is_empty() {
        return writeln!(out, "✓ No {} found (checked {} {})", failure_label, total, total_label);
    }

    writeln!(
        out,
        "⚠ Found {} {} out of {} total",
        failures.len(),
        failure_label,
        total
    )?;
    for failure in failures {
        writeln!(out, "  - {} ({})", failure.url, failure.status_text())?;
    }
    Ok(())
}

fn write_header(out: &mut String, sitemap_url: &str, generated_at: DateTime<Local>) -> fmt::Result {
    writeln!(out, "SITEMAP GUARDIAN - ISSUES REPORT")?;
    writeln!(out, "Date: {}", generated_at.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "Sitemap URL: {}", sitemap_url)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out)
}

// Writes `contents` to issues_<timestamp>.txt inside `dir`
//
// Returns the path of the written file.
pub fn write_report(dir: &Path, contents: &str, generated_at: DateTime<Local>) -> Result<PathBuf> {
    let file_name = format!("issues_{}.txt", generated_at.format("%Y-%m-%d_%H-%M-%S"));
    let path = dir.join(file_name);

    std::fs::write(&path, contents)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    Ok(path)
}
