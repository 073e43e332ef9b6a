//! Incremental CSV persistence
//!
//! Records are appended one batch at a time so that at most one list page's
//! worth of records is ever held in memory. The file is removed when the
//! sink is created and the header is written by the first flush that finds
//! no file on disk.

use crate::output::{SinkError, SinkResult};
use crate::record::{EnrichedRecord, CSV_HEADER};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// Append-only CSV sink for one run
#[derive(Debug)]
pub struct CsvSink {
    path: PathBuf,
    rows_written: u64,
}

impl CsvSink {
    /// Creates a sink at `path`, deleting any file left by a previous run
    ///
    /// Missing parent directories are created.
    pub fn create(path: impl Into<PathBuf>) -> SinkResult<Self> {
        let path = path.into();

        match fs::remove_file(&path) {
            Ok(()) => tracing::info!("Removed previous output at {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(SinkError::Io(e)),
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        Ok(Self {
            path,
            rows_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of data rows appended by this sink
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Appends `batch` to the file and drains it
    ///
    /// An empty batch touches nothing. On error the batch is left intact.
    ///
    /// # Returns
    ///
    /// The number of rows appended
    pub fn flush(&mut self, batch: &mut Vec<EnrichedRecord>) -> SinkResult<usize> {
        if batch.is_empty() {
            return Ok(0);
        }

        let mut writer = self.open_writer()?;
        for record in batch.iter() {
            writer.write_record(record.as_row())?;
        }
        writer.flush()?;

        let count = batch.len();
        batch.clear();
        self.rows_written += count as u64;

        tracing::debug!("Flushed {} records to {}", count, self.path.display());
        Ok(count)
    }

    /// Makes sure the file exists with its header, even if nothing was
    /// collected during the run
    pub fn finish(&mut self) -> SinkResult<()> {
        if !self.path.exists() {
            let mut writer = self.open_writer()?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Opens the file for appending, writing the header if it is new
    fn open_writer(&self) -> SinkResult<csv::Writer<fs::File>> {
        let write_header = !self.path.exists();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if write_header {
            writer.write_record(CSV_HEADER)?;
        }

        Ok(writer)
    }
}

/// Re-reads a finished CSV file and counts its data rows
pub fn count_rows(path: &Path) -> SinkResult<u64> {
    let mut reader = csv::Reader::from_path(path)?;

    let mut rows = 0;
    for record in reader.records() {
        record?;
        rows += 1;
    }
    Ok(rows)
}
