// src/main.rs
// =============================================================================
// This is the entry point of the CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Build a CrawlRequest from flags or from a JSON payload
// 3. Run the crawl (Ctrl-C cancels it and keeps the partial report)
// 4. Print the report and exit with a proper code
//    (0 = no broken links, 1 = broken links, 2 = error)
// =============================================================================

mod cli;
mod logging;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, EngineArgs};
use link_warden::{check_links_with_cancellation, BrokenStatus, CrawlReport, CrawlRequest, CrawlerConfig};
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = no broken links
//   Ok(1) = broken links found
//   Err   = bad input or internal error (exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    match cli.command {
        Commands::Site {
            website_url,
            max_depth,
            max_links,
            json,
            engine,
        } => {
            let request = CrawlRequest::new(&website_url, max_depth, max_links)?;
            handle_crawl(request, engine, json).await
        }
        Commands::Request { payload, engine } => {
            let payload = match payload {
                Some(payload) => payload,
                None => read_stdin().await?,
            };
            let request = CrawlRequest::from_json(&payload)?;
            handle_crawl(request, engine, true).await
        }
    }
}

async fn read_stdin() -> Result<String> {
    let mut payload = String::new();
    tokio::io::stdin()
        .read_to_string(&mut payload)
        .await
        .context("failed to read request payload from stdin")?;
    Ok(payload)
}

async fn handle_crawl(request: CrawlRequest, engine: EngineArgs, json: bool) -> Result<i32> {
    let config = CrawlerConfig {
        concurrency: engine.concurrency,
        request_timeout: Duration::from_secs(engine.timeout),
        ..CrawlerConfig::default()
    };

    info!(
        "Scanning {} (max depth {}, max links {})",
        request.base_url(),
        request.max_depth(),
        request.max_link_budget()
    );

    // Ctrl-C stops scheduling new fetches; the partial report is still printed
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, finishing with a partial report");
            on_interrupt.cancel();
        }
    });

    let report = check_links_with_cancellation(&request, &config, cancel).await?;

    print_report(&report, json)?;

    Ok(if report.has_broken_links() { 1 } else { 0 })
}

fn print_report(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_table(report);
    }
    Ok(())
}

// Prints broken links as a human-readable table, then a summary
fn print_table(report: &CrawlReport) {
    if report.broken_links.is_empty() {
        println!("✅ No broken links found");
    } else {
        println!("{:<60} {:<15} {:<30}", "URL", "STATUS", "MESSAGE");
        println!("{}", "=".repeat(105));

        for link in &report.broken_links {
            let url_display = if link.url.chars().count() > 57 {
                format!("{}...", link.url.chars().take(57).collect::<String>())
            } else {
                link.url.clone()
            };

            let (status, message) = match &link.status {
                BrokenStatus::Code(code) => (format!("❌ {}", code), String::new()),
                BrokenStatus::Reason(reason) => ("⚠️  ERROR".to_string(), reason.clone()),
            };

            println!("{:<60} {:<15} {:<30}", url_display, status, message);
        }
    }

    println!();
    println!("📊 Summary:");
    println!("   📋 Checked: {}", report.total_checked);
    println!("   ❌ Broken: {}", report.total_broken);
}
