// src/checker/mod.rs
// =============================================================================
// Fetching and classifying a single URL.
//
// Submodules:
// - http: issues the GET and decides healthy / broken / page
// - html: pulls anchor targets out of an HTML body
// =============================================================================

mod html;
mod http;

pub use html::extract_html_links;
pub use http::{BrokenStatus, LinkChecker, LinkResult};
