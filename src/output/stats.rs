//! Statistics generation from an index file
//!
//! This module provides functionality for reading back an `index.csv` and
//! displaying what a crawl produced.

use crate::storage::{read_index, IndexRecord, StorageResult};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Index statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexStatistics {
    /// Number of rows in the index
    pub total_rows: u64,

    /// Count of rows by status column (`200`, `404`, `ERR`, ...)
    pub rows_by_status: BTreeMap<String, u64>,

    /// Count of rows by crawl depth
    pub rows_by_depth: BTreeMap<u32, u64>,

    /// Rows with a 2xx status
    pub successes: u64,

    /// Successful rows that saved no file
    pub empty_successes: u64,

    /// Total bytes of saved article text
    pub total_bytes: u64,

    /// URLs that appear on more than one row
    pub duplicate_urls: Vec<String>,
}

impl IndexStatistics {
    /// Computes statistics from index rows
    pub fn from_records(records: &[IndexRecord]) -> Self {
        let mut stats = Self::default();
        let mut seen = HashSet::new();

        for record in records {
            stats.total_rows += 1;
            *stats.rows_by_status.entry(record.status.clone()).or_insert(0) += 1;
            *stats.rows_by_depth.entry(record.depth).or_insert(0) += 1;
            stats.total_bytes += record.bytes;

            if record.is_success() {
                stats.successes += 1;
                if record.is_empty_success() {
                    stats.empty_successes += 1;
                }
            }

            if !seen.insert(record.url.as_str()) && !stats.duplicate_urls.contains(&record.url) {
                stats.duplicate_urls.push(record.url.clone());
            }
        }

        stats
    }

    /// Percentage of rows with a 2xx status
    pub fn success_rate(&self) -> f64 {
        if self.total_rows > 0 {
            (self.successes as f64 / self.total_rows as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Loads statistics from an index file
///
/// # Arguments
///
/// * `path` - Path to an `index.csv` written by a previous crawl
///
/// # Returns
///
/// * `Ok(IndexStatistics)` - Successfully loaded statistics
/// * `Err(StorageError)` - The file could not be read or parsed
pub fn load_index_statistics(path: &Path) -> StorageResult<IndexStatistics> {
    let records = read_index(path)?;
    Ok(IndexStatistics::from_records(&records))
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &IndexStatistics) {
    println!("=== Index Statistics ===\n");

    println!("Overview:");
    println!("  Total rows: {}", stats.total_rows);
    println!("  Article bytes: {}", stats.total_bytes);
    println!();

    println!("Rows by Status:");
    // Sort statuses by count (descending)
    let mut status_counts: Vec<_> = stats.rows_by_status.iter().collect();
    status_counts.sort_by(|a, b| b.1.cmp(a.1));

    for (status, count) in status_counts {
        let percentage = if stats.total_rows > 0 {
            (*count as f64 / stats.total_rows as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", status, count, percentage);
    }
    println!();

    println!("Rows by Depth:");
    for (depth, count) in &stats.rows_by_depth {
        println!("  {}: {}", depth, count);
    }
    println!();

    if stats.empty_successes > 0 {
        println!("Pages without content: {}", stats.empty_successes);
        println!();
    }

    if !stats.duplicate_urls.is_empty() {
        println!("Duplicate URLs ({}):", stats.duplicate_urls.len());
        for url in &stats.duplicate_urls {
            println!("  - {}", url);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} rows successful)",
        stats.success_rate(),
        stats.successes,
        stats.total_rows
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CrawlIndex, CsvIndex};
    use tempfile::TempDir;

    fn row(url: &str, status: &str, depth: u32, file: &str, bytes: u64) -> IndexRecord {
        IndexRecord {
            title: String::new(),
            url: url.to_string(),
            file: file.to_string(),
            bytes,
            status: status.to_string(),
            depth,
            out_links: 0,
        }
    }

    #[test]
    fn test_statistics_from_records() {
        let records = vec![
            row("https://h/wiki/A", "200", 0, "A.txt", 100),
            row("https://h/wiki/B", "200", 1, "", 0),
            row("https://h/wiki/C", "404", 1, "", 0),
            row("https://h/wiki/D", "ERR", 1, "", 0),
        ];
        let stats = IndexStatistics::from_records(&records);

        assert_eq!(stats.total_rows, 4);
        assert_eq!(stats.successes, 2);
        assert_eq!(stats.empty_successes, 1);
        assert_eq!(stats.total_bytes, 100);
        assert_eq!(stats.rows_by_status.get("200"), Some(&2));
        assert_eq!(stats.rows_by_status.get("ERR"), Some(&1));
        assert_eq!(stats.rows_by_depth.get(&1), Some(&3));
        assert!(stats.duplicate_urls.is_empty());
        assert!((stats.success_rate() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unsaved_article_is_not_an_empty_success() {
        let records = vec![
            row("https://h/wiki/A", "200", 0, "A.txt", 10),
            row("https://h/wiki/B", "SAVE_ERR", 1, "", 0),
        ];
        let stats = IndexStatistics::from_records(&records);

        assert_eq!(stats.successes, 1);
        assert_eq!(stats.empty_successes, 0);
        assert_eq!(stats.rows_by_status.get("SAVE_ERR"), Some(&1));
    }

    #[test]
    fn test_statistics_detect_duplicates() {
        let records = vec![
            row("https://h/wiki/A", "200", 0, "A.txt", 1),
            row("https://h/wiki/A", "200", 1, "A_2.txt", 1),
            row("https://h/wiki/A", "500", 1, "", 0),
        ];
        let stats = IndexStatistics::from_records(&records);
        assert_eq!(stats.duplicate_urls, vec!["https://h/wiki/A".to_string()]);
    }

    #[test]
    fn test_empty_statistics() {
        let stats = IndexStatistics::from_records(&[]);
        assert_eq!(stats.total_rows, 0);
        assert_eq!(stats.success_rate(), 0.0);
    }

    #[test]
    fn test_load_index_statistics() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.csv");
        let mut index = CsvIndex::create(&path).unwrap();
        index
            .record(&row("https://h/wiki/A", "200", 0, "A.txt", 10))
            .unwrap();
        index.record(&row("https://h/wiki/B", "503", 1, "", 0)).unwrap();

        let stats = load_index_statistics(&path).unwrap();
        assert_eq!(stats.total_rows, 2);
        assert_eq!(stats.successes, 1);
    }
}
