//! CSV index of attempted URLs

use crate::storage::{CrawlIndex, IndexRecord, StorageResult};
use csv::{Reader, Writer, WriterBuilder};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Column names of `index.csv`, in order
pub const INDEX_HEADER: [&str; 7] = ["title", "url", "file", "bytes", "status", "depth", "out_links"];

/// Index backed by a CSV file
///
/// The file is truncated when the index is created, the header is written
/// immediately, and every row is flushed as soon as it is recorded so a crash
/// loses at most the row being written.
pub struct CsvIndex {
    writer: Writer<File>,
    path: PathBuf,
}

impl CsvIndex {
    /// Creates (or truncates) the index file at `path`
    pub fn create(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(&path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer.write_record(INDEX_HEADER)?;
        writer.flush()?;

        Ok(Self { writer, path })
    }
}

impl CrawlIndex for CsvIndex {
    fn record(&mut self, record: &IndexRecord) -> StorageResult<()> {
        self.writer.serialize(record)?;
        self.writer.flush()?;
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

/// Reads every row of an existing index file
pub fn read_index(path: &Path) -> StorageResult<Vec<IndexRecord>> {
    let mut reader = Reader::from_path(path)?;
    let records = reader
        .deserialize()
        .collect::<Result<Vec<IndexRecord>, csv::Error>>()?;
    Ok(records)
}
