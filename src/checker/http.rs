// src/checker/http.rs
// =============================================================================
// The fetch & classify worker.
//
// Key functionality:
// - Makes exactly one HTTP GET per URL (bounded by a timeout, never retried)
// - Sorts the outcome into one of four buckets (see LinkResult)
// - Parses HTML bodies for outgoing links when the page may still be crawled
//
// The worker knows nothing about visited sets or budgets. It is a pure
// "fetch + parse" unit; scheduling decisions live in crate::crawl.
//
// Rust concepts:
// - async/await: the GET is the only place a crawl ever waits
// - Enums: LinkResult / BrokenStatus model every possible outcome
// =============================================================================

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::html::extract_html_links;
use crate::config::CrawlerConfig;

// Why a link is broken
//
// Serialized "untagged" so JSON callers see either a number or a string:
//   {"url": "...", "status": 404}
//   {"url": "...", "status": "timeout: operation timed out"}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BrokenStatus {
    /// The server answered with an HTTP status >= 400
    Code(u16),
    /// The request never produced a usable response
    Reason(String),
}

impl BrokenStatus {
    pub fn is_code(&self) -> bool {
        matches!(self, BrokenStatus::Code(_))
    }
}

impl std::fmt::Display for BrokenStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrokenStatus::Code(code) => write!(f, "HTTP {}", code),
            BrokenStatus::Reason(reason) => f.write_str(reason),
        }
    }
}

/// Outcome of visiting one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkResult {
    /// Reachable, nothing further to crawl (non-HTML content)
    Healthy,
    /// HTTP error status or transport failure
    Broken(BrokenStatus),
    /// Reachable HTML page together with the links found on it
    Page(Vec<String>),
}

/// Performs GETs and classifies the responses.
///
/// Cloning is cheap: reqwest's `Client` is reference counted internally and
/// pools connections across clones.
#[derive(Debug, Clone)]
pub struct LinkChecker {
    client: Client,
    max_depth: usize,
}

impl LinkChecker {
    /// Builds a worker whose pages at `max_depth` or deeper are not parsed,
    /// since their links could never be scheduled.
    pub fn new(config: &CrawlerConfig, max_depth: usize) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client, max_depth })
    }

    // Fetches one URL and classifies the response
    //
    // Order of checks:
    // 1. transport failure            -> Broken(Reason)
    // 2. status >= 400                -> Broken(Code), body is never parsed
    // 3. non-HTML content             -> Healthy
    // 4. HTML at the depth limit      -> Page with no links (body skipped)
    // 5. HTML within the depth budget -> Page with every anchor target
    pub async fn visit(&self, url: &str, depth: usize) -> LinkResult {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return LinkResult::Broken(BrokenStatus::Reason(describe_error(&e))),
        };

        let status = response.status();
        if status.as_u16() >= 400 {
            return LinkResult::Broken(BrokenStatus::Code(status.as_u16()));
        }

        if !is_html(response.headers()) {
            return LinkResult::Healthy;
        }

        if depth >= self.max_depth {
            return LinkResult::Page(Vec::new());
        }

        // Links on a redirected page are relative to where we ended up
        let page_url = response.url().clone();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return LinkResult::Broken(BrokenStatus::Reason(describe_error(&e))),
        };

        let links = extract_html_links(&body, &page_url);
        debug!(url, depth, links = links.len(), "parsed page");
        LinkResult::Page(links)
    }
}

// True when the content-type header announces an HTML document
fn is_html(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            let value = value.to_ascii_lowercase();
            value.contains("text/html") || value.contains("application/xhtml+xml")
        })
        .unwrap_or(false)
}

// Turns a reqwest error into a human-readable description
//
// The category comes first so callers can group failures; the full error
// chain follows because reqwest's top-level message alone is rarely useful
// ("error sending request for url ...").
fn describe_error(error: &reqwest::Error) -> String {
    let detail = error_chain(error);
    let lower = detail.to_ascii_lowercase();
    let looks_like_tls = lower.contains("certificate") || lower.contains("tls") || lower.contains("ssl");

    let category = if error.is_timeout() {
        "timeout"
    } else if error.is_redirect() {
        "too many redirects"
    } else if error.is_connect() {
        if lower.contains("dns") || lower.contains("resolve") || lower.contains("lookup") {
            "dns error"
        } else if looks_like_tls {
            "tls error"
        } else {
            "connection failed"
        }
    } else if looks_like_tls {
        "tls error"
    } else {
        "request failed"
    };

    format!("{}: {}", category, detail)
}

// Joins an error with all of its sources: "outer: inner: innermost"
fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
