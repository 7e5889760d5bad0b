//! Storage module for persisting crawl output
//!
//! This module handles everything the crawler writes to disk:
//! - One `.txt` file per saved article, named from its title
//! - The `index.csv` file with one row per attempted URL

mod csv_index;
mod files;
mod traits;

pub use csv_index::{read_index, CsvIndex, INDEX_HEADER};
pub use files::{sanitize_filename, FileArticleStore, MAX_STEM_BYTES, MAX_STEM_LEN};
pub use traits::{ArticleStore, CrawlIndex, SavedArticle, StorageError, StorageResult};

use crate::crawler::{FailureReason, FrontierEntry};
use serde::{Deserialize, Serialize};

/// Status written for failures that never received an HTTP response
pub const NO_RESPONSE_STATUS: &str = "ERR";

/// Status written for fetched pages whose article file could not be written
pub const SAVE_FAILED_STATUS: &str = "SAVE_ERR";

/// Represents one row of the index
///
/// Field order matches the `index.csv` columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    pub title: String,
    pub url: String,
    pub file: String,
    pub bytes: u64,
    pub status: String,
    pub depth: u32,
    pub out_links: usize,
}

impl IndexRecord {
    /// Row for a page that was fetched successfully
    ///
    /// `saved` is `None` for content-absent pages and pages reached after the
    /// budget ran out, which leaves the file column empty.
    pub fn success(
        entry: &FrontierEntry,
        title: &str,
        status: u16,
        saved: Option<&SavedArticle>,
        out_links: usize,
    ) -> Self {
        Self {
            title: title.to_string(),
            url: entry.url.to_string(),
            file: saved.map(|s| s.file_name.clone()).unwrap_or_default(),
            bytes: saved.map(|s| s.bytes).unwrap_or(0),
            status: status.to_string(),
            depth: entry.depth,
            out_links,
        }
    }

    /// Row for a page that could not be fetched
    pub fn failure(entry: &FrontierEntry, last_status: Option<u16>) -> Self {
        Self {
            title: String::new(),
            url: entry.url.to_string(),
            file: String::new(),
            bytes: 0,
            status: last_status
                .map(|s| s.to_string())
                .unwrap_or_else(|| NO_RESPONSE_STATUS.to_string()),
            depth: entry.depth,
            out_links: 0,
        }
    }

    /// Row for a fetched page whose article could not be written
    ///
    /// The page counts as failed, so the row must not read as a success.
    pub fn save_failure(entry: &FrontierEntry, title: &str, out_links: usize) -> Self {
        Self {
            title: title.to_string(),
            url: entry.url.to_string(),
            file: String::new(),
            bytes: 0,
            status: SAVE_FAILED_STATUS.to_string(),
            depth: entry.depth,
            out_links,
        }
    }

    /// Returns true if the status column holds a 2xx code
    pub fn is_success(&self) -> bool {
        self.status
            .parse::<u16>()
            .map(|code| (200..300).contains(&code))
            .unwrap_or(false)
    }

    /// Returns true if the row belongs to a success with no saved file
    pub fn is_empty_success(&self) -> bool {
        self.is_success() && self.file.is_empty()
    }
}

/// Short description of why a failure row has its status, for logging
pub fn describe_failure(reason: FailureReason, last_status: Option<u16>) -> String {
    match last_status {
        Some(status) => format!("{} (HTTP {})", reason, status),
        None => reason.to_string(),
    }
}
