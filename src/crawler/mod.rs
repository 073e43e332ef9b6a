//! Crawler module for browser-driven listing collection
//!
//! This module contains the core crawling logic, including:
//! - Snapshot extraction of list cards and detail fields
//! - The navigation state machine over a browser session
//! - Overall crawl coordination

mod coordinator;
mod extractor;
mod navigator;

pub use coordinator::Coordinator;
pub use extractor::{extract_detail_fields, extract_summaries, ExtractError, Selectors};
pub use navigator::{Navigator, NavigatorSettings, PaginationStrategy};

use crate::browser::ChromeSession;
use crate::config::Config;
use crate::output::{CrawlReport, LogProgress};
use crate::HarvestError;

/// Runs a complete crawl in a fresh Chrome session
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Launch Chrome
/// 2. Clear any previous output file
/// 3. Walk every result page and detail page
/// 4. Persist unique records as it goes
/// 5. Report the number of rows written
///
/// Progress lines are logged only when a record cap is set.
///
/// # Example
///
/// ```no_run
/// use hotel_harvest::config::{resolve_config, Overrides};
/// use hotel_harvest::crawler::crawl;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let overrides = Overrides {
///     location: Some("Paris".to_string()),
///     max_hotels: Some(10),
///     ..Default::default()
/// };
/// let (config, _) = resolve_config(None, &overrides)?;
/// let report = crawl(&config)?;
/// println!("{} hotels", report.records_collected);
/// # Ok(())
/// # }
/// ```
pub fn crawl(config: &Config) -> Result<CrawlReport, HarvestError> {
    let session = ChromeSession::launch(&config.browser)?;
    let mut coordinator = Coordinator::new(config, session)?;

    if config.search.max_hotels.is_some() {
        coordinator = coordinator.with_observer(Box::new(LogProgress::new()));
    }

    coordinator.run()
}
