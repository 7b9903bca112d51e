// src/error.rs
// =============================================================================
// Errors the library can hand back to a caller.
//
// Only request-level problems are errors. A URL that fails to load is NOT an
// error here: it becomes a row in the report (see report.rs).
//
// Rust concepts:
// - thiserror: derives std::error::Error and Display from attributes
// - #[from]: lets the ? operator convert one error type into another
// =============================================================================

use thiserror::Error;

// Problems with the crawl request itself, detected before any fetch happens
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// A required field was absent or empty
    #[error("missing required parameter '{0}'")]
    MissingParameter(&'static str),

    /// The base URL is not an absolute http(s) URL
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// A numeric setting is out of range (e.g. a link budget of 0)
    #[error("invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The JSON request payload could not be decoded
    #[error("malformed request payload: {0}")]
    InvalidPayload(String),
}

// Everything check_links() can fail with
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Input(#[from] InputError),

    /// The HTTP client could not be constructed (e.g. TLS backend failure)
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
