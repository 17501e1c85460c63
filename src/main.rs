// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (diagnostics go to stderr via tracing)
// 3. Dispatch to the subcommand handler
// 4. Print the report and, if needed, save it to a file
// 5. Exit with proper code (0 = no issues, 1 = issues found, 2 = error)
// =============================================================================

mod checker; // src/checker/ - extraction, resolution, probing
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - run settings
mod crawl; // src/crawl/ - page analysis and the sitemap walk
mod error; // src/error.rs - typed fetch errors
mod report; // src/report.rs - issues report rendering
mod sitemap; // src/sitemap/ - sitemap discovery

use anyhow::{Context, Result};
use clap::Parser;
use cli::{CheckArgs, Cli, Commands};
use config::{load_ignore_file, CheckSettings, CrawlConfig};
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = no issues
//   Ok(1) = issues found
//   Ok(2) = the sitemap could not be read
//   Err   = bad arguments or I/O failure
async fn run(cli: Cli) -> Result<i32> {
    let client = checker::build_client().context("Failed to build HTTP client")?;

    match cli.command {
        Commands::Sitemap {
            sitemap_url,
            limit,
            ignore,
            ignore_file,
            report_dir,
            no_report,
            check,
        } => {
            let mut config = CrawlConfig::new(sitemap_url);
            config.page_limit = limit;
            config.settings = check_settings(&check);
            config.ignore.extend(ignore);
            if let Some(path) = ignore_file {
                config.ignore.extend(load_ignore_file(&path)?);
            }

            let report_dir = (!no_report).then_some(report_dir);
            handle_sitemap(&client, &config, check.json, report_dir.as_deref()).await
        }
        Commands::Page { page_url, check } => {
            handle_page(&client, &page_url, &check_settings(&check), check.json).await
        }
    }
}

fn check_settings(args: &CheckArgs) -> CheckSettings {
    CheckSettings {
        max_links_per_page: args.max_links,
        fetch_timeout: Duration::from_secs(args.timeout),
        ..CheckSettings::default()
    }
}

// Handles the 'sitemap' subcommand
async fn handle_sitemap(
    client: &reqwest::Client,
    config: &CrawlConfig,
    json: bool,
    report_dir: Option<&Path>,
) -> Result<i32> {
    tracing::info!("Fetching sitemap from: {}", config.sitemap_url);
    let started = chrono::Local::now();

    let summary = match crawl::run_crawl(client, config).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("{}", e);
            // JSON consumers still get one object on stdout
            if json {
                let value = report::error_json(&config.sitemap_url, &e);
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            if let Some(dir) = report_dir {
                let text = report::render_error_report(&config.sitemap_url, &e, started);
                let path = report::write_report(dir, &text, started)?;
                tracing::info!("Error report saved to: {}", path.display());
            }
            return Ok(2);
        }
    };

    let text = report::render_report(&summary, started);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", text);
    }

    if !summary.has_issues() {
        tracing::info!("No issues found. No report file was generated.");
        return Ok(0);
    }

    if let Some(dir) = report_dir {
        let path = report::write_report(dir, &text, started)?;
        tracing::info!("Issues report saved to: {}", path.display());
    }

    Ok(1)
}

// Handles the 'page' subcommand
async fn handle_page(
    client: &reqwest::Client,
    page_url: &str,
    settings: &CheckSettings,
    json: bool,
) -> Result<i32> {
    let report = crawl::analyze_page(client, page_url, 1, settings).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report::render_page(&report, 1));
    }

    Ok(if report.has_issues { 1 } else { 0 })
}

// Default level is info; -v raises it to debug, -q lowers it to warn.
// RUST_LOG wins when set.
fn setup_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sitemap_guardian={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
