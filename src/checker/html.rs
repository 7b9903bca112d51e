// src/checker/html.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// We also use the `url` crate to resolve relative hrefs against the URL of
// the page they appear on (NOT the crawl's base URL).
//
// Links pointing to other sites are returned too. Deciding what is "same
// site" is the frontier's job; this module only parses.
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

// Extracts every anchor target from an HTML document
//
// Parameters:
//   html: the HTML content to parse (borrowed as &str)
//   page_url: the URL the HTML was served from
//
// Returns: absolute URLs in document order. Anchors without an href, or with
// an empty one, are skipped. Hrefs that cannot be resolved are dropped.
//
// Example:
//   html = "<a href='docs'>Docs</a>"
//   page_url = "https://example.com/guide/"
//   result = ["https://example.com/guide/docs"]
pub fn extract_html_links(html: &str, page_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);

    // "a[href]" is a constant selector, so parsing cannot fail at runtime
    let selector = Selector::parse("a[href]").expect("static anchor selector is valid");

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_url(page_url, href))
        .collect()
}

// Resolves a possibly-relative href to an absolute URL string
//
// Examples:
//   base = "https://example.com/page"
//   href = "/docs"              -> Some("https://example.com/docs")
//   href = "../other"           -> Some("https://example.com/other")
//   href = "https://other.com"  -> Some("https://other.com/")
//   href = ""                   -> None
//   href = "http://[::1"        -> None (malformed)
fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    // Url::join handles both absolute and relative references
    base.join(href).ok().map(String::from)
}
