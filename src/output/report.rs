use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Summary of a finished crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Accepted successes, content-absent pages included
    pub saved: u32,

    /// Accepted successes that had no extractable content
    pub empty: u32,

    /// URLs that ended in a failure row
    pub failed: u32,

    /// Index rows written (one per dispatched URL)
    pub attempted: u32,

    /// Nominal page budget of the run
    pub page_limit: u32,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Location of `index.csv`
    pub index_path: PathBuf,

    /// Directory the article files were written to
    pub output_dir: PathBuf,
}

impl CrawlReport {
    /// Number of article files written
    pub fn files_written(&self) -> u32 {
        self.saved.saturating_sub(self.empty)
    }

    /// Wall-clock duration of the run in seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Prints the run report to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");
    println!(
        "Started:  {}",
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "Finished: {} ({}s)",
        report.finished_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.duration_seconds()
    );
    println!();

    println!("Pages:");
    println!("  Attempted: {}", report.attempted);
    println!("  Saved: {} / {}", report.saved, report.page_limit);
    if report.empty > 0 {
        println!("  Without content: {}", report.empty);
    }
    println!("  Failed: {}", report.failed);
    println!();

    println!("Output:");
    println!("  Articles: {}", report.output_dir.display());
    println!("  Index: {}", report.index_path.display());
}
