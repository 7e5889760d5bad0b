//! Crawler module for article fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - Polite HTTP fetching with a request permit pool, spacing and retry backoff
//! - The breadth-first frontier with its admission rules
//! - HTML parsing and link extraction
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod politeness;

pub use coordinator::{run_crawl, Coordinator, PageResult, TaskReport};
pub use fetcher::{
    build_http_client, classify_status, AttemptError, FailureReason, FetchOutcome, PoliteFetcher,
};
pub use frontier::{Frontier, FrontierEntry};
pub use parser::{clean_text, PageParser, ParsedArticle, WikiPageParser};
pub use politeness::Pacer;

use crate::config::Config;
use crate::output::CrawlReport;
use crate::TrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the seed URL from the start topic
/// 2. Build the HTTP client and request permit pool
/// 3. Create the output directory and index
/// 4. Fetch pages breadth-first until the frontier or budget runs out
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed; per-URL failures are in the index
/// * `Err(TrawlError)` - Setup failed or the index could not be written
pub async fn crawl(config: &Config) -> Result<CrawlReport, TrawlError> {
    run_crawl(config).await
}
