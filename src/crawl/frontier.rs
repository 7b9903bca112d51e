// src/crawl/frontier.rs
// =============================================================================
// The frontier: which URLs still need a visit, and which were already taken.
//
// How it works:
// 1. The base URL is seeded at depth 0
// 2. Every link a page yields is offered back through try_enqueue()
// 3. try_enqueue() normalizes it and admits it only if it is new, shallow
//    enough, inside the site prefix, and the link budget has room
// 4. drain() hands out queued entries and knows how many are still running
//
// The frontier is owned by the crawl loop alone and mutated through &mut
// self. That single owner is what makes check-and-insert atomic: two pages
// linking to the same URL are processed one after the other, so only the
// first offer wins.
//
// Rust concepts:
// - HashSet: visited URLs (O(1) membership test)
// - VecDeque: FIFO queue, so the crawl proceeds breadth-first
// =============================================================================

use std::collections::{HashSet, VecDeque};

use tracing::trace;
use url::Url;

use crate::config::CrawlRequest;

/// A URL waiting to be fetched, and how many hops it is from the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    pub depth: usize,
}

/// What the crawl loop should do next.
#[derive(Debug, PartialEq, Eq)]
pub enum Drain {
    /// Fetch this entry
    Entry(FrontierEntry),
    /// Queue is empty but fetches are still running; they may add more work
    Pending,
    /// Queue is empty and nothing is in flight: the crawl is over
    Empty,
}

#[derive(Debug)]
pub struct Frontier {
    prefix: String,
    seed: String,
    max_depth: usize,
    max_link_budget: usize,
    visited: HashSet<String>,
    queue: VecDeque<FrontierEntry>,
    in_flight: usize,
}

impl Frontier {
    pub fn new(request: &CrawlRequest) -> Self {
        Self {
            prefix: request.base_url().to_string(),
            seed: normalize(request.base().clone()),
            max_depth: request.max_depth(),
            max_link_budget: request.max_link_budget(),
            visited: HashSet::new(),
            queue: VecDeque::new(),
            in_flight: 0,
        }
    }

    // Schedules the base URL at depth 0
    //
    // The seed skips the prefix check: the parsed base may print differently
    // from the caller's text (e.g. "HTTPS://X.test" becomes "https://x.test/")
    // and it must still be crawled.
    pub fn seed(&mut self) -> bool {
        if self.visited.len() >= self.max_link_budget || !self.visited.insert(self.seed.clone()) {
            return false;
        }
        self.queue.push_back(FrontierEntry {
            url: self.seed.clone(),
            depth: 0,
        });
        true
    }

    /// Offers an absolute URL discovered at `depth` hops from the base.
    ///
    /// Returns `true` if it was scheduled. A rejected URL leaves the frontier
    /// untouched; unparseable URLs are rejected silently.
    pub fn try_enqueue(&mut self, url: &str, depth: usize) -> bool {
        let Some(url) = Url::parse(url).ok().map(normalize) else {
            trace!(url, "dropping unparseable link");
            return false;
        };

        if depth > self.max_depth
            || self.budget_exhausted()
            || !url.starts_with(&self.prefix)
            || self.visited.contains(&url)
        {
            return false;
        }

        trace!(url = url.as_str(), depth, "scheduled");
        self.visited.insert(url.clone());
        self.queue.push_back(FrontierEntry { url, depth });
        true
    }

    /// Pops the next entry and counts it as in flight until `complete()`.
    pub fn drain(&mut self) -> Drain {
        match self.queue.pop_front() {
            Some(entry) => {
                self.in_flight += 1;
                Drain::Entry(entry)
            }
            None if self.in_flight > 0 => Drain::Pending,
            None => Drain::Empty,
        }
    }

    /// Marks one drained entry as finished.
    pub fn complete(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Number of distinct URLs ever scheduled
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn budget_exhausted(&self) -> bool {
        self.visited.len() >= self.max_link_budget
    }
}

// Canonical string form of a URL used for dedup and prefix checks
//
// The url crate already lowercases scheme and host, drops default ports and
// resolves dot segments. On top of that the fragment is removed, because
// "/page#a" and "/page#b" are the same document.
fn normalize(mut url: Url) -> String {
    url.set_fragment(None);
    url.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frontier(base: &str, max_depth: usize, budget: usize) -> Frontier {
        let request = CrawlRequest::new(base, max_depth, budget).unwrap();
        let mut frontier = Frontier::new(&request);
        assert!(frontier.seed());
        frontier
    }

    #[test]
    fn test_seed_is_depth_zero() {
        let mut frontier = frontier("https://x.test/", 3, 100);
        assert_eq!(
            frontier.drain(),
            Drain::Entry(FrontierEntry {
                url: "https://x.test/".to_string(),
                depth: 0,
            })
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut frontier = frontier("https://x.test/", 3, 100);
        assert!(frontier.try_enqueue("https://x.test/a", 1));
        assert!(!frontier.try_enqueue("https://x.test/a", 1));
        assert!(!frontier.try_enqueue("https://x.test/a", 2));
        assert!(!frontier.try_enqueue("https://x.test/", 1));
        assert_eq!(frontier.visited_count(), 2);
    }

    #[test]
    fn test_fragment_variants_are_one_url() {
        let mut frontier = frontier("https://x.test/", 3, 100);
        assert!(frontier.try_enqueue("https://x.test/a#intro", 1));
        assert!(!frontier.try_enqueue("https://x.test/a#usage", 1));
        assert!(!frontier.try_enqueue("https://x.test/a", 1));
    }

    #[test]
    fn test_depth_limit() {
        let mut frontier = frontier("https://x.test/", 1, 100);
        assert!(frontier.try_enqueue("https://x.test/a", 1));
        assert!(!frontier.try_enqueue("https://x.test/b", 2));
        assert_eq!(frontier.visited_count(), 2);
    }

    #[test]
    fn test_budget_limit() {
        let mut frontier = frontier("https://x.test/", 3, 2);
        assert!(frontier.try_enqueue("https://x.test/a", 1));
        assert!(frontier.budget_exhausted());
        assert!(!frontier.try_enqueue("https://x.test/b", 1));
        assert_eq!(frontier.visited_count(), 2);
    }

    #[test]
    fn test_budget_of_one_admits_only_seed() {
        let mut frontier = frontier("https://x.test/", 3, 1);
        assert!(!frontier.try_enqueue("https://x.test/a", 1));
        assert_eq!(frontier.visited_count(), 1);
    }

    #[test]
    fn test_literal_prefix_scoping() {
        let mut frontier = frontier("https://x.test/docs/", 3, 100);
        assert!(frontier.try_enqueue("https://x.test/docs/guide", 1));
        assert!(!frontier.try_enqueue("https://x.test/blog/post", 1));
        assert!(!frontier.try_enqueue("https://other.test/docs/guide", 1));
        assert!(!frontier.try_enqueue("mailto:someone@x.test", 1));
    }

    #[test]
    fn test_prefix_without_trailing_slash_matches_siblings() {
        // Literal prefix semantics: "/docs" also admits "/docs-old"
        let mut frontier = frontier("https://x.test/docs", 3, 100);
        assert!(frontier.try_enqueue("https://x.test/docs-old/page", 1));
    }

    #[test]
    fn test_unparseable_link_dropped_without_cost() {
        let mut frontier = frontier("https://x.test/", 3, 2);
        assert!(!frontier.try_enqueue("not a url", 1));
        assert_eq!(frontier.visited_count(), 1);
        assert!(frontier.try_enqueue("https://x.test/a", 1));
    }

    #[test]
    fn test_drain_tracks_in_flight_work() {
        let mut frontier = frontier("https://x.test/", 3, 100);

        assert!(matches!(frontier.drain(), Drain::Entry(_)));
        // Queue is empty but the seed is still being fetched
        assert_eq!(frontier.drain(), Drain::Pending);

        assert!(frontier.try_enqueue("https://x.test/a", 1));
        frontier.complete();
        assert!(matches!(frontier.drain(), Drain::Entry(_)));
        frontier.complete();

        assert_eq!(frontier.in_flight(), 0);
        assert_eq!(frontier.drain(), Drain::Empty);
    }
}
