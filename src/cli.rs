// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the CLI structure is described by Rust structs
// and attributes, and clap generates the parser (plus --help and --version).
// =============================================================================

use clap::{Args, Parser, Subcommand};
use link_warden::config::{DEFAULT_CONCURRENCY, DEFAULT_MAX_DEPTH, DEFAULT_MAX_LINK_BUDGET};

#[derive(Parser, Debug)]
#[command(
    name = "link-warden",
    version,
    about = "Crawl a website and report its broken links",
    long_about = "link-warden crawls a website from a base URL, following same-site links up to a \
                  depth limit and a link budget, and reports every URL that answers with an HTTP \
                  error or cannot be reached at all."
)]
pub struct Cli {
    /// Log every visit and scheduling decision to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a website for broken links
    ///
    /// Example: link-warden site https://example.com/ --max-depth 2
    Site {
        /// Base URL; only URLs starting with this exact text are crawled
        website_url: String,

        /// Link hops to follow from the base URL (0 = only the base URL)
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        /// Maximum number of distinct URLs to check
        #[arg(long, default_value_t = DEFAULT_MAX_LINK_BUDGET)]
        max_links: usize,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Run a crawl described by a JSON payload and print the JSON report
    ///
    /// Example: link-warden request '{"baseUrl": "https://example.com/", "maxDepth": 1}'
    Request {
        /// JSON payload with baseUrl, maxDepth and maxLinkBudget; read from stdin when omitted
        payload: Option<String>,

        #[command(flatten)]
        engine: EngineArgs,
    },
}

// Settings for the crawl engine itself, shared by both subcommands
#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Maximum number of requests in flight at once
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 5)]
    pub timeout: u64,
}
