//! Output module for crawl summaries and reports
//!
//! This module handles:
//! - The end-of-run report returned by the coordinator
//! - Statistics recomputed from an existing `index.csv`

mod report;
pub mod stats;

pub use report::{print_report, CrawlReport};
pub use stats::{load_index_statistics, print_statistics, IndexStatistics};
