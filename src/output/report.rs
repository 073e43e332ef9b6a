//! End-of-run report

use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Summary of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Location that was searched
    pub location: String,

    /// Successful pagination advances
    pub pages_visited: u32,

    /// Unique records accepted during the run
    pub records_collected: u64,

    /// Data rows found when re-reading the output, `None` if it could not be read
    pub rows_persisted: Option<u64>,

    pub output_path: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Number of result pages seen, counting the first one
    pub fn result_pages(&self) -> u32 {
        self.pages_visited + 1
    }
}

/// Prints the report to stdout in a formatted manner
pub fn print_report(report: &CrawlReport) {
    println!("=== Hotel Harvest Report ===\n");

    println!("Search:");
    println!("  Location: {}", report.location);
    println!("  Result pages: {}", report.result_pages());
    println!("  Duration: {}s", report.duration_seconds());
    println!();

    match report.rows_persisted {
        Some(rows) => {
            println!("Scraping complete! Collected data for {} hotels.", rows);
            println!("Data saved to {}", report.output_path.display());
        }
        None => {
            println!(
                "Collected {} hotels, but {} could not be read back.",
                report.records_collected,
                report.output_path.display()
            );
        }
    }
}
