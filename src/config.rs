// src/config.rs
// =============================================================================
// Inputs to a crawl.
//
// Two layers:
// - CrawlRequest: what the caller asks for (base URL, depth, link budget).
//   Arrives either from CLI flags or from a JSON payload.
// - CrawlerConfig: how the engine behaves (concurrency, timeouts, redirects).
//
// Both are validated up front so a bad request never starts crawling.
// =============================================================================

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::InputError;

/// Default number of link hops followed from the base URL
pub const DEFAULT_MAX_DEPTH: usize = 3;
/// Default cap on distinct URLs scheduled during one crawl
pub const DEFAULT_MAX_LINK_BUDGET: usize = 100;
/// Default number of fetches allowed in flight at once
pub const DEFAULT_CONCURRENCY: usize = 16;
/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
/// Default redirect hops before a URL counts as a redirect loop
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

// The JSON payload accepted from the surrounding HTTP layer
//
// Example:
//   {"baseUrl": "https://example.com/", "maxDepth": 2}
//
// Every field is optional at the serde level so that a missing baseUrl
// surfaces as InputError::MissingParameter instead of a generic decode error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckLinksPayload {
    pub base_url: Option<String>,
    pub max_depth: Option<usize>,
    pub max_link_budget: Option<usize>,
}

/// A validated, immutable crawl request.
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    base_url: String,
    base: Url,
    max_depth: usize,
    max_link_budget: usize,
}

impl CrawlRequest {
    /// Validates the three request parameters.
    ///
    /// `base_url` is kept verbatim (minus surrounding whitespace): its literal
    /// text is the prefix every crawled URL must start with.
    pub fn new(base_url: &str, max_depth: usize, max_link_budget: usize) -> Result<Self, InputError> {
        let base_url = base_url.trim();
        if base_url.is_empty() {
            return Err(InputError::MissingParameter("baseUrl"));
        }

        let base = Url::parse(base_url).map_err(|e| InputError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(InputError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", base.scheme()),
            });
        }

        if max_link_budget == 0 {
            return Err(InputError::InvalidParameter {
                name: "maxLinkBudget",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            base_url: base_url.to_string(),
            base,
            max_depth,
            max_link_budget,
        })
    }

    /// Builds a request from a decoded payload, filling in defaults.
    pub fn from_payload(payload: CheckLinksPayload) -> Result<Self, InputError> {
        let base_url = payload
            .base_url
            .ok_or(InputError::MissingParameter("baseUrl"))?;

        Self::new(
            &base_url,
            payload.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
            payload.max_link_budget.unwrap_or(DEFAULT_MAX_LINK_BUDGET),
        )
    }

    /// Decodes and validates a JSON payload in one step.
    pub fn from_json(json: &str) -> Result<Self, InputError> {
        let payload: CheckLinksPayload =
            serde_json::from_str(json).map_err(|e| InputError::InvalidPayload(e.to_string()))?;
        Self::from_payload(payload)
    }

    /// The base URL exactly as the caller gave it
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The parsed base URL (used as the crawl seed)
    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn max_link_budget(&self) -> usize {
        self.max_link_budget
    }
}

/// Engine tunables, independent of any single request.
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Upper bound on simultaneous in-flight fetches
    pub concurrency: usize,
    /// Timeout applied to each individual GET
    pub request_timeout: Duration,
    /// Redirect hops followed before giving up
    pub max_redirects: usize,
    /// Value sent in the User-Agent header
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: concat!("link-warden/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl CrawlerConfig {
    pub fn validate(&self) -> Result<(), InputError> {
        if self.concurrency == 0 {
            return Err(InputError::InvalidParameter {
                name: "concurrency",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(InputError::InvalidParameter {
                name: "requestTimeout",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
