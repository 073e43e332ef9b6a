//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that ties together:
//! - The navigator, which moves the browser between list and detail pages
//! - The extractor, which reads listings out of page snapshots
//! - The dedup store and run context, which decide what is kept
//! - The CSV sink, which persists each list page's records
//! - The optional progress observer

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::crawler::extractor::{extract_detail_fields, extract_summaries, Selectors};
use crate::crawler::navigator::{Navigator, NavigatorSettings};
use crate::output::{count_rows, CrawlReport, CsvSink, ProgressObserver};
use crate::record::EnrichedRecord;
use crate::state::{DedupStore, RunContext};
use crate::url::{absolute_link, search_url};
use crate::HarvestError;
use chrono::Utc;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator<B: BrowserSession> {
    navigator: Navigator<B>,
    selectors: Selectors,
    sink: CsvSink,
    dedup: DedupStore,
    context: RunContext,
    observer: Option<Box<dyn ProgressObserver>>,
    search_url: Url,
    base_url: String,
    location: String,
}

impl<B: BrowserSession> Coordinator<B> {
    /// Creates a new coordinator over an already started browser session
    ///
    /// Any output file left at the configured path is deleted here, so the
    /// run always starts from a clean slate.
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    /// * `session` - The browser session to drive
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(HarvestError)` - Invalid selectors, search URL or output path
    pub fn new(config: &Config, session: B) -> Result<Self, HarvestError> {
        let selectors = Selectors::compile(&config.selectors)?;
        let search_url = search_url(
            &config.search.base_url,
            &config.search.search_path,
            &config.search.location,
        )?;
        let sink = CsvSink::create(&config.output.path)?;

        Ok(Self {
            navigator: Navigator::new(session, NavigatorSettings::from_config(config)),
            selectors,
            sink,
            dedup: DedupStore::new(),
            context: RunContext::new(config.search.max_hotels),
            observer: None,
            search_url,
            base_url: config.search.base_url.clone(),
            location: config.search.location.clone(),
        })
    }

    /// Attaches a progress observer
    pub fn with_observer(mut self, observer: Box<dyn ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Runs the crawl to completion
    ///
    /// Whatever way the crawl ends (no more pages, cap reached, or an
    /// unexpected error) the residual batch is flushed, the observer is
    /// closed and the browser is released before returning. An unexpected
    /// error is returned after that cleanup.
    pub fn run(mut self) -> Result<CrawlReport, HarvestError> {
        let started_at = Utc::now();
        tracing::info!("Scraping hotels in {}...", self.location);

        if let Some(observer) = self.observer.as_mut() {
            observer.start(self.context.target_cap());
        }

        let mut batch = Vec::new();
        let outcome = self.crawl(&mut batch);

        let persisted = self
            .sink
            .flush(&mut batch)
            .and_then(|_| self.sink.finish());

        if let Some(observer) = self.observer.as_mut() {
            observer.finish();
        }
        self.navigator.release();

        match (outcome, persisted) {
            (Err(e), Err(sink)) => {
                tracing::error!(
                    "Failed to finalize {}: {}",
                    self.sink.path().display(),
                    sink
                );
                return Err(e);
            }
            (Err(e), Ok(())) => return Err(e),
            (Ok(()), Err(sink)) => return Err(sink.into()),
            (Ok(()), Ok(())) => {}
        }

        let rows_persisted = match count_rows(self.sink.path()) {
            Ok(rows) => Some(rows),
            Err(e) => {
                tracing::error!("Error reading final CSV: {}", e);
                None
            }
        };

        tracing::info!(
            "Crawl completed: {} hotels over {} result pages",
            self.context.records_collected,
            self.context.pages_visited + 1
        );

        Ok(CrawlReport {
            location: self.location,
            pages_visited: self.context.pages_visited,
            records_collected: self.context.records_collected,
            rows_persisted,
            output_path: self.sink.path().to_path_buf(),
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// The list page loop: scrape, flush, paginate
    fn crawl(&mut self, batch: &mut Vec<EnrichedRecord>) -> Result<(), HarvestError> {
        if self.context.cap_reached() {
            tracing::info!("Record cap is 0, nothing to collect");
            return Ok(());
        }

        self.navigator.open(self.search_url.as_str())?;

        loop {
            self.scrape_list_page(batch)?;

            if self.context.cap_reached() {
                tracing::info!(
                    "Reached the cap of {} hotels",
                    self.context.records_collected
                );
                break;
            }

            self.sink.flush(batch)?;

            if !self.navigator.advance_page(self.context.pages_visited)? {
                break;
            }
            self.context.page_advanced();
            tracing::debug!("Moved to result page {}", self.context.pages_visited + 1);
        }

        Ok(())
    }

    /// Visits every card of the current list page
    fn scrape_list_page(&mut self, batch: &mut Vec<EnrichedRecord>) -> Result<(), HarvestError> {
        let snapshot = self.navigator.list_snapshot()?;
        let summaries = extract_summaries(&snapshot, &self.selectors);
        tracing::debug!(
            "Found {} hotel cards on result page {}",
            summaries.len(),
            self.context.pages_visited + 1
        );

        for summary in summaries {
            if self.context.cap_reached() {
                break;
            }

            let link = absolute_link(&self.base_url, &summary.detail_link);
            let selectors = &self.selectors;
            let detail = match self
                .navigator
                .visit_detail(&link, |html| extract_detail_fields(html, selectors))?
            {
                Some(detail) => detail,
                None => continue,
            };

            let record = EnrichedRecord::new(summary, detail, link);
            if !self.dedup.insert_if_novel(record.identity_key()) {
                tracing::debug!("Skipping duplicate hotel: {}", record.name);
                continue;
            }

            if self.context.record_collected() {
                if let Some(observer) = self.observer.as_mut() {
                    observer.advance(&record.name);
                }
                batch.push(record);
            }
        }

        Ok(())
    }
}
