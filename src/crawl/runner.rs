// src/crawl/runner.rs
// =============================================================================
// The crawl loop: ties the frontier, the workers and the report together.
//
// How it works:
// 1. Seed the frontier with the base URL
// 2. Keep up to `concurrency` visits running at once
// 3. As each visit finishes:
//    - its result is recorded in the report (broken links are appended)
//    - links from HTML pages are offered back to the frontier
// 4. Stop when the frontier is empty AND nothing is in flight, or when the
//    caller cancels
//
// Rust concepts:
// - FuturesUnordered: a pool of futures polled together, yielding results
//   in completion order (like buffer_unordered, but refillable)
// - tokio::select!: wait on "next result" and "cancelled" at the same time
// =============================================================================

use futures::stream::{FuturesUnordered, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::frontier::{Drain, Frontier, FrontierEntry};
use crate::checker::{LinkChecker, LinkResult};
use crate::config::{CrawlRequest, CrawlerConfig};
use crate::error::CheckError;
use crate::report::{CrawlReport, ReportAggregator};

/// Crawls `request.base_url()` and reports every broken link found.
///
/// Per-URL failures are data in the report; only invalid configuration or a
/// client that cannot be built is returned as an error.
pub async fn check_links(request: &CrawlRequest, config: &CrawlerConfig) -> Result<CrawlReport, CheckError> {
    check_links_with_cancellation(request, config, CancellationToken::new()).await
}

/// Like [`check_links`], but stops early once `cancel` fires.
///
/// On cancellation no new fetches are started and in-flight fetches are
/// dropped. The report covers what finished; `total_checked` still counts
/// every URL that had been scheduled.
#[tracing::instrument(skip_all, fields(base_url = request.base_url()))]
pub async fn check_links_with_cancellation(
    request: &CrawlRequest,
    config: &CrawlerConfig,
    cancel: CancellationToken,
) -> Result<CrawlReport, CheckError> {
    config.validate()?;

    let checker = LinkChecker::new(config, request.max_depth())?;
    let aggregator = ReportAggregator::new();
    let mut frontier = Frontier::new(request);
    frontier.seed();

    info!(
        max_depth = request.max_depth(),
        max_link_budget = request.max_link_budget(),
        concurrency = config.concurrency,
        "starting crawl"
    );

    let mut in_flight = FuturesUnordered::new();

    loop {
        // Top the pool up to the concurrency limit
        while in_flight.len() < config.concurrency {
            match frontier.drain() {
                Drain::Entry(entry) => in_flight.push(visit(&checker, &aggregator, entry)),
                Drain::Pending | Drain::Empty => break,
            }
        }

        // Queue empty and nothing running
        if in_flight.is_empty() {
            break;
        }

        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                warn!(
                    in_flight = in_flight.len(),
                    queued = frontier.queued(),
                    "crawl cancelled"
                );
                break;
            }

            Some((entry, links)) = in_flight.next() => {
                frontier.complete();
                let mut scheduled = 0;
                for link in &links {
                    if frontier.try_enqueue(link, entry.depth + 1) {
                        scheduled += 1;
                    }
                }
                if !links.is_empty() {
                    debug!(
                        url = entry.url.as_str(),
                        found = links.len(),
                        scheduled,
                        "links offered to frontier"
                    );
                }
            }
        }
    }

    // Abandon whatever is still running before reading the final state
    drop(in_flight);

    Ok(aggregator.finalize(frontier.visited_count()))
}

// One unit of work: fetch, record, and hand back any discovered links
async fn visit(
    checker: &LinkChecker,
    aggregator: &ReportAggregator,
    entry: FrontierEntry,
) -> (FrontierEntry, Vec<String>) {
    debug!(url = entry.url.as_str(), depth = entry.depth, "visiting");
    let result = checker.visit(&entry.url, entry.depth).await;
    aggregator.record(&entry.url, &result);

    let links = match result {
        LinkResult::Page(links) => links,
        LinkResult::Healthy | LinkResult::Broken(_) => Vec::new(),
    };
    (entry, links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::BrokenStatus;
    use crate::report::BrokenLink;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn html(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html")
    }

    async fn mount(server: &MockServer, route: &str, response: ResponseTemplate, hits: u64) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(response)
            .expect(hits)
            .mount(server)
            .await;
    }

    // "/" -> "/a"; "/a" -> "/", "/b"; "/b" is 404
    async fn small_site(root_hits: u64, a_hits: u64, b_hits: u64) -> MockServer {
        let server = MockServer::start().await;
        mount(&server, "/", html(r#"<a href="/a">A</a>"#), root_hits).await;
        mount(&server, "/a", html(r#"<a href="/">Home</a><a href="/b">B</a>"#), a_hits).await;
        mount(&server, "/b", ResponseTemplate::new(404), b_hits).await;
        server
    }

    async fn run(base: &str, max_depth: usize, budget: usize) -> CrawlReport {
        let request = CrawlRequest::new(base, max_depth, budget).unwrap();
        check_links(&request, &CrawlerConfig::default()).await.unwrap()
    }

    #[tokio::test]
    async fn test_small_site_reports_the_404() {
        let server = small_site(1, 1, 1).await;
        let base = format!("{}/", server.uri());

        let report = run(&base, 3, 100).await;

        assert_eq!(report.total_checked, 3);
        assert_eq!(report.total_broken, 1);
        assert_eq!(
            report.broken_links,
            vec![BrokenLink {
                url: format!("{}/b", server.uri()),
                status: BrokenStatus::Code(404),
            }]
        );
    }

    #[tokio::test]
    async fn test_depth_zero_fetches_only_the_seed() {
        let server = small_site(1, 0, 0).await;
        let report = run(&format!("{}/", server.uri()), 0, 100).await;

        assert_eq!(report.total_checked, 1);
        assert_eq!(report.total_broken, 0);
    }

    #[tokio::test]
    async fn test_budget_of_one_fetches_only_the_seed() {
        let server = small_site(1, 0, 0).await;
        let report = run(&format!("{}/", server.uri()), 3, 1).await;

        assert_eq!(report.total_checked, 1);
        assert!(report.broken_links.is_empty());
    }

    #[tokio::test]
    async fn test_budget_caps_total_checked() {
        let server = MockServer::start().await;
        let links: String = (0..10).map(|i| format!(r#"<a href="/p{}">p</a>"#, i)).collect();
        mount(&server, "/", html(&links), 1).await;
        for i in 0..10 {
            Mock::given(method("GET"))
                .and(path(format!("/p{}", i)))
                .respond_with(html("<p>leaf</p>"))
                .mount(&server)
                .await;
        }

        let report = run(&format!("{}/", server.uri()), 3, 4).await;
        assert_eq!(report.total_checked, 4);
    }

    #[tokio::test]
    async fn test_same_site_prefix_limits_crawl() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/docs/",
            html(r#"<a href="guide">Guide</a><a href="/blog/post">Blog</a><a href="https://other.test/">Other</a>"#),
            1,
        )
        .await;
        mount(&server, "/docs/guide", html("<p>guide</p>"), 1).await;
        mount(&server, "/blog/post", ResponseTemplate::new(404), 0).await;

        let report = run(&format!("{}/docs/", server.uri()), 3, 100).await;
        assert_eq!(report.total_checked, 2);
        assert_eq!(report.total_broken, 0);
    }

    #[tokio::test]
    async fn test_shared_links_fetched_once() {
        let server = MockServer::start().await;
        mount(&server, "/", html(r#"<a href="/a">A</a><a href="/b">B</a>"#), 1).await;
        mount(&server, "/a", html(r#"<a href="/c#top">C</a><a href="/b">B</a>"#), 1).await;
        mount(&server, "/b", html(r#"<a href="/c#bottom">C</a><a href="/a">A</a>"#), 1).await;
        mount(&server, "/c", ResponseTemplate::new(410), 1).await;

        let report = run(&format!("{}/", server.uri()), 5, 100).await;
        assert_eq!(report.total_checked, 4);
        assert_eq!(report.total_broken, 1);
        assert_eq!(report.broken_links[0].status, BrokenStatus::Code(410));
    }

    #[tokio::test]
    async fn test_single_worker_gives_same_counts() {
        let server = small_site(1, 1, 1).await;
        let request = CrawlRequest::new(&format!("{}/", server.uri()), 3, 100).unwrap();
        let config = CrawlerConfig {
            concurrency: 1,
            ..CrawlerConfig::default()
        };

        let report = check_links(&request, &config).await.unwrap();
        assert_eq!(report.total_checked, 3);
        assert_eq!(report.total_broken, 1);
    }

    #[tokio::test]
    async fn test_unreachable_site_reports_the_seed() {
        let report = run("http://127.0.0.1:1/", 3, 100).await;

        assert_eq!(report.total_checked, 1);
        assert_eq!(report.total_broken, 1);
        assert_eq!(report.broken_links[0].url, "http://127.0.0.1:1/");
        assert!(!report.broken_links[0].status.is_code());
    }

    #[tokio::test]
    async fn test_cancellation_stops_a_slow_crawl() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(html("<p>slow</p>").set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let request = CrawlRequest::new(&format!("{}/", server.uri()), 3, 100).unwrap();
        let config = CrawlerConfig::default();
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let report = tokio::time::timeout(
            Duration::from_secs(2),
            check_links_with_cancellation(&request, &config, cancel),
        )
        .await
        .expect("cancelled crawl should return promptly")
        .unwrap();

        assert_eq!(report.total_checked, 1);
        assert_eq!(report.total_broken, 0);
    }

    #[tokio::test]
    async fn test_invalid_config_rejected_before_crawling() {
        let request = CrawlRequest::new("https://x.test/", 3, 100).unwrap();
        let config = CrawlerConfig {
            concurrency: 0,
            ..CrawlerConfig::default()
        };

        let err = check_links(&request, &config).await.unwrap_err();
        assert!(matches!(err, CheckError::Input(_)));
    }
}
