//! Bounded concurrent site crawler for broken-link detection.
//!
//! Starting from a base URL, the crawler follows same-site hyperlinks up to a
//! depth limit and a link budget, fetches every scheduled URL once, and
//! returns a [`CrawlReport`] listing each broken link with either its HTTP
//! status code or a description of the transport failure.
//!
//! ```no_run
//! # async fn demo() -> Result<(), link_warden::CheckError> {
//! use link_warden::{check_links, CrawlRequest, CrawlerConfig};
//!
//! let request = CrawlRequest::from_json(r#"{"baseUrl": "https://example.com/"}"#)?;
//! let report = check_links(&request, &CrawlerConfig::default()).await?;
//! println!("{} of {} links broken", report.total_broken, report.total_checked);
//! # Ok(())
//! # }
//! ```

pub mod checker;
pub mod config;
pub mod crawl;
pub mod error;
pub mod report;

pub use checker::{BrokenStatus, LinkChecker, LinkResult};
pub use config::{CheckLinksPayload, CrawlRequest, CrawlerConfig};
pub use crawl::{check_links, check_links_with_cancellation};
pub use error::{CheckError, InputError};
pub use report::{BrokenLink, CrawlReport};
