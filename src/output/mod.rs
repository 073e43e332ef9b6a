//! Output module for persisting and reporting crawl results
//!
//! This module handles:
//! - Appending collected records to the CSV file, one batch per list page
//! - Reporting progress while the crawl runs
//! - Summarizing the finished run

mod csv_sink;
mod progress;
mod report;

pub use csv_sink::{count_rows, CsvSink};
pub use progress::{LogProgress, ProgressObserver};
pub use report::{print_report, CrawlReport};

use thiserror::Error;

/// Errors that can occur while writing or re-reading the output file
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for output operations
pub type SinkResult<T> = Result<T, SinkError>;
