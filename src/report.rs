// src/report.rs
// =============================================================================
// Collecting results into the final crawl report.
//
// The aggregator is shared by every in-flight fetch. Appends to the broken
// list go through a mutex so simultaneous completions are neither lost nor
// duplicated. Healthy and page results only bump counters used for logging:
// the reported "checked" total comes from the frontier's visited set.
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::checker::{BrokenStatus, LinkResult};

/// One broken URL and why it is broken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenLink {
    pub url: String,
    pub status: BrokenStatus,
}

/// The response produced for one crawl.
///
/// `broken_links` is in completion order, which varies between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlReport {
    pub broken_links: Vec<BrokenLink>,
    pub total_checked: usize,
    pub total_broken: usize,
}

impl CrawlReport {
    pub fn has_broken_links(&self) -> bool {
        self.total_broken > 0
    }
}

#[derive(Debug, Default)]
pub struct ReportAggregator {
    broken: Mutex<Vec<BrokenLink>>,
    healthy: AtomicUsize,
    pages: AtomicUsize,
}

impl ReportAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    // Routes a worker's result to the matching record_* method
    pub fn record(&self, url: &str, result: &LinkResult) {
        match result {
            LinkResult::Healthy => self.record_healthy(),
            LinkResult::Page(_) => self.record_page(),
            LinkResult::Broken(status) => self.record_broken(url, status.clone()),
        }
    }

    /// Appends a broken link. The frontier never schedules a URL twice, so
    /// each URL arrives here at most once.
    pub fn record_broken(&self, url: &str, status: BrokenStatus) {
        warn!(url, status = %status, "broken link");
        // A panic elsewhere while holding the lock leaves the Vec intact
        let mut broken = self.broken.lock().unwrap_or_else(PoisonError::into_inner);
        broken.push(BrokenLink {
            url: url.to_string(),
            status,
        });
    }

    pub fn record_healthy(&self) {
        self.healthy.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_page(&self) {
        self.pages.fetch_add(1, Ordering::Relaxed);
    }

    // Consumes the aggregator once no fetch is outstanding
    //
    // Parameters:
    //   total_checked: final size of the frontier's visited set
    pub fn finalize(self, total_checked: usize) -> CrawlReport {
        let broken_links = self.broken.into_inner().unwrap_or_else(PoisonError::into_inner);
        let total_broken = broken_links.len();

        info!(
            total_checked,
            total_broken,
            pages = self.pages.load(Ordering::Relaxed),
            healthy = self.healthy.load(Ordering::Relaxed),
            "crawl finished"
        );

        CrawlReport {
            broken_links,
            total_checked,
            total_broken,
        }
    }
}
