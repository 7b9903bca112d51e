// src/crawl/mod.rs
// =============================================================================
// This module handles site crawling.
//
// Features:
// - Breadth-first frontier with dedup, depth limit and link budget
// - Same-site restriction by literal prefix of the base URL
// - Bounded pool of concurrent fetches
// - Whole-crawl cancellation
//
// Submodules:
// - frontier: what to visit next and what was already scheduled
// - runner: the loop that drives workers until the frontier is exhausted
// =============================================================================

mod frontier;
mod runner;

pub use frontier::{Drain, Frontier, FrontierEntry};
pub use runner::{check_links, check_links_with_cancellation};
