//! Storage traits and error types
//!
//! This module defines the sinks a crawl writes into: an article store for page
//! text and an index that receives one row per attempted URL.

use crate::storage::IndexRecord;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid article name: {0:?}")]
    InvalidName(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Location and size of a stored article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArticle {
    /// File name relative to the store's directory
    pub file_name: String,

    /// Number of bytes written
    pub bytes: u64,
}

/// Sink for article text
///
/// Called only from the coordinator, so implementations need no interior locking.
pub trait ArticleStore: Send {
    /// Persists one article's body
    ///
    /// # Arguments
    ///
    /// * `title` - The article title, used to derive the file name
    /// * `url` - The article URL, used for naming when the title is empty
    /// * `body` - The extracted text
    fn save(&mut self, title: &str, url: &str, body: &str) -> StorageResult<SavedArticle>;

    /// Directory articles are written under
    fn directory(&self) -> &Path;
}

/// Append-only sink for per-URL index rows
pub trait CrawlIndex: Send {
    /// Appends one row; the row must be durable once this returns
    fn record(&mut self, record: &IndexRecord) -> StorageResult<()>;

    /// Where the index lives
    fn location(&self) -> &Path;
}
