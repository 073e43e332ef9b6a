//! Progress reporting
//!
//! The coordinator reports every accepted record to an optional
//! `ProgressObserver`. The bundled implementation writes progress lines
//! through `tracing`.

/// Receives progress notifications during a crawl
pub trait ProgressObserver {
    /// Called once before the crawl, with the record cap if one is set
    fn start(&mut self, total: Option<u64>);

    /// Called once per accepted record with a short label
    fn advance(&mut self, label: &str);

    /// Called once after the crawl
    fn finish(&mut self);
}

/// Longest label shown in a progress line
const LABEL_WIDTH: usize = 20;

/// Logs a progress line for every collected hotel
#[derive(Debug, Default)]
pub struct LogProgress {
    total: Option<u64>,
    done: u64,
}

impl LogProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn done(&self) -> u64 {
        self.done
    }

    fn format_line(&self, label: &str) -> String {
        let short: String = label.chars().take(LABEL_WIDTH).collect();
        match self.total {
            Some(total) => format!("Hotels scraped: {}/{} (Last: {}...)", self.done, total, short),
            None => format!("Hotels scraped: {} (Last: {}...)", self.done, short),
        }
    }
}

impl ProgressObserver for LogProgress {
    fn start(&mut self, total: Option<u64>) {
        self.total = total;
        self.done = 0;
    }

    fn advance(&mut self, label: &str) {
        self.done += 1;
        tracing::info!("{}", self.format_line(label));
    }

    fn finish(&mut self) {
        tracing::info!("Hotels scraped: {} in total", self.done);
    }
}
