//! Navigation controller
//!
//! Drives a single `BrowserSession` through the search results:
//! - loading the search page, with one reload on a load timeout
//! - dismissing the cookie consent banner when present
//! - visiting each listing's detail page and getting back to the list
//! - clicking through to the next result page until there is none
//!
//! Timeouts and missing markers never end the run from here. They are
//! downgraded to warnings, to "no enrichment" for a listing, or to the end of
//! pagination.

use crate::browser::{BrowserResult, BrowserSession};
use crate::config::Config;
use crate::state::NavState;
use crate::HarvestError;
use std::time::Duration;

/// Chooses the next-page control for a pagination cycle
///
/// The results page shows a single "next" button before the first page
/// change and a "previous"/"next" pair afterwards, so the first cycle and
/// every later cycle use different locators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationStrategy {
    first: String,
    subsequent: String,
}

impl PaginationStrategy {
    pub fn new(first: impl Into<String>, subsequent: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            subsequent: subsequent.into(),
        }
    }

    /// Returns the locator for pagination cycle `cycle` (0-based)
    pub fn locator_for(&self, cycle: u32) -> &str {
        if cycle == 0 {
            &self.first
        } else {
            &self.subsequent
        }
    }
}

/// Markers, wait budgets and delays used by the navigator
#[derive(Debug, Clone)]
pub struct NavigatorSettings {
    pub list_marker: String,
    pub detail_marker: String,
    pub consent: String,
    pub pagination: PaginationStrategy,
    pub consent_timeout: Duration,
    pub list_ready_timeout: Duration,
    pub detail_ready_timeout: Duration,
    pub pagination_list_timeout: Duration,
    pub next_button_timeout: Duration,
    pub back_settle: Duration,
    pub page_settle: Duration,
    pub pagination_retries: u32,
}

impl NavigatorSettings {
    pub fn from_config(config: &Config) -> Self {
        let selectors = &config.selectors;
        let timeouts = &config.timeouts;

        Self {
            list_marker: selectors.list_marker.clone(),
            detail_marker: selectors.detail_marker.clone(),
            consent: selectors.consent.clone(),
            pagination: PaginationStrategy::new(
                selectors.next_first.clone(),
                selectors.next_subsequent.clone(),
            ),
            consent_timeout: Duration::from_millis(timeouts.consent_ms),
            list_ready_timeout: Duration::from_millis(timeouts.list_ready_ms),
            detail_ready_timeout: Duration::from_millis(timeouts.detail_ready_ms),
            pagination_list_timeout: Duration::from_millis(timeouts.pagination_list_ms),
            next_button_timeout: Duration::from_millis(timeouts.next_button_ms),
            back_settle: Duration::from_millis(timeouts.back_settle_ms),
            page_settle: Duration::from_millis(timeouts.page_settle_ms),
            pagination_retries: timeouts.pagination_retries,
        }
    }
}

/// State machine over one browser session
pub struct Navigator<B: BrowserSession> {
    session: B,
    settings: NavigatorSettings,
    state: NavState,
}

impl<B: BrowserSession> Navigator<B> {
    pub fn new(session: B, settings: NavigatorSettings) -> Self {
        Self {
            session,
            settings,
            state: NavState::Init,
        }
    }

    /// Current navigation state
    pub fn state(&self) -> NavState {
        self.state
    }

    fn transition(&mut self, next: NavState) -> Result<(), HarvestError> {
        if !self.state.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }

        tracing::trace!("Navigation: {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Loads the search results and brings the session to `ListReady`
    ///
    /// A load timeout gets exactly one reload; whatever the reload does, the
    /// crawl proceeds. Any other navigation failure is returned.
    pub fn open(&mut self, url: &str) -> Result<(), HarvestError> {
        tracing::info!("Loading search results: {}", url);

        match self.session.navigate(url) {
            Ok(()) => {}
            Err(e) if e.is_timeout() => {
                tracing::warn!("Page load timed out, retrying...");
                if let Err(e) = self.session.reload() {
                    tracing::warn!("Reload did not complete: {}", e);
                }
            }
            Err(e) => return Err(e.into()),
        }

        self.transition(NavState::CookieConsent)?;
        self.accept_cookies();

        self.transition(NavState::ListReady)?;
        self.wait_for_list(self.settings.list_ready_timeout);
        Ok(())
    }

    /// Best effort: a missing or unclickable consent control is ignored
    fn accept_cookies(&mut self) {
        let consent = self.settings.consent.as_str();
        let result = self
            .session
            .wait_until_clickable(consent, self.settings.consent_timeout)
            .and_then(|()| self.session.click(consent));

        match result {
            Ok(()) => tracing::debug!("Accepted cookie consent"),
            Err(e) => tracing::debug!("No cookie consent to accept: {}", e),
        }
    }

    /// Waits for the list container; a timeout is only a warning
    fn wait_for_list(&mut self, timeout: Duration) -> bool {
        match self
            .session
            .wait_until_present(&self.settings.list_marker, timeout)
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Timed out waiting for hotel listings, continuing... ({})", e);
                false
            }
        }
    }

    /// Returns the current list page's HTML
    pub fn list_snapshot(&mut self) -> Result<String, HarvestError> {
        if !self.state.on_list() {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to: NavState::ListReady,
            });
        }

        Ok(self.session.page_source()?)
    }

    /// Visits one detail page and returns to the list
    ///
    /// `read` receives the detail page HTML. Any failure while navigating,
    /// waiting for the detail marker or reading the page is logged and turns
    /// into `Ok(None)`. Either way exactly one history-back is issued, so the
    /// browser is never left on the detail page.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(T))` - The page was read
    /// * `Ok(None)` - The visit failed; the listing yields nothing
    /// * `Err(HarvestError)` - The session was not on a list page
    pub fn visit_detail<T, F>(&mut self, url: &str, read: F) -> Result<Option<T>, HarvestError>
    where
        F: FnOnce(&str) -> T,
    {
        self.transition(NavState::DetailVisit)?;
        tracing::debug!("Visiting detail page: {}", url);

        let outcome = self.load_detail(url).map(|html| read(&html));

        self.transition(NavState::ReturnToList)?;
        let fields = match outcome {
            Ok(fields) => {
                if let Err(e) = self.session.navigate_back() {
                    tracing::warn!("History back failed after {}: {}", url, e);
                }
                self.session.settle(self.settings.back_settle);
                Some(fields)
            }
            Err(e) => {
                tracing::error!("Error processing hotel at {}: {}", url, e);
                if let Err(back) = self.session.navigate_back() {
                    tracing::warn!("History back failed after {}: {}", url, back);
                }
                None
            }
        };

        self.transition(NavState::ListReady)?;
        Ok(fields)
    }

    fn load_detail(&mut self, url: &str) -> BrowserResult<String> {
        self.session.navigate(url)?;
        self.session
            .wait_until_present(&self.settings.detail_marker, self.settings.detail_ready_timeout)?;
        self.session.page_source()
    }

    /// Moves to the next result page
    ///
    /// `cycle` is the number of page changes made so far; it selects the
    /// next-page locator. A missing or unclickable control is read as the end
    /// of the results, after `pagination_retries` extra attempts.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The next page was opened
    /// * `Ok(false)` - There is no next page (or it could not be reached)
    /// * `Err(HarvestError)` - A non-recoverable browser failure
    pub fn advance_page(&mut self, cycle: u32) -> Result<bool, HarvestError> {
        self.transition(NavState::Paginate)?;

        let locator = self.settings.pagination.locator_for(cycle).to_string();
        let attempts = self.settings.pagination_retries + 1;

        for attempt in 1..=attempts {
            match self.click_next(&locator) {
                Ok(()) => {
                    self.session.settle(self.settings.page_settle);
                    self.transition(NavState::ListReady)?;
                    self.wait_for_list(self.settings.list_ready_timeout);
                    return Ok(true);
                }
                Err(e) if !e.is_recoverable() => return Err(e.into()),
                Err(e) if attempt < attempts => {
                    tracing::debug!(
                        "Next page control not ready (attempt {}/{}): {}",
                        attempt,
                        attempts,
                        e
                    );
                }
                Err(e) => {
                    tracing::info!("No further result pages ({})", e);
                }
            }
        }

        Ok(false)
    }

    fn click_next(&mut self, locator: &str) -> BrowserResult<()> {
        self.session
            .wait_until_present(&self.settings.list_marker, self.settings.pagination_list_timeout)?;
        self.session
            .wait_until_clickable(locator, self.settings.next_button_timeout)?;
        self.session.click(locator)
    }

    /// Releases the browser session; calling it again is a no-op
    pub fn release(&mut self) {
        if self.state.is_terminal() {
            return;
        }

        self.state = NavState::Terminal;
        if let Err(e) = self.session.quit() {
            tracing::warn!("Failed to release browser session: {}", e);
        }
    }
}

