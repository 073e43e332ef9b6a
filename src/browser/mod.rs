//! Browser session abstraction
//!
//! The crawler only ever talks to a browser through the `BrowserSession`
//! trait. The production implementation drives headless Chrome; tests drive
//! an in-memory fake over fixture HTML.

mod chrome;

pub use chrome::ChromeSession;

use std::time::Duration;
use thiserror::Error;

/// Errors raised by a browser session
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Timed out after {timeout:?} waiting for {what}")]
    Timeout { what: String, timeout: Duration },

    #[error("Element not found: {0}")]
    NotFound(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Script evaluation failed: {0}")]
    Script(String),

    #[error("Driver error: {0}")]
    Driver(String),

    #[error("Browser session already closed")]
    Closed,
}

impl BrowserError {
    /// Returns true for the failures the crawler downgrades to defaults or
    /// termination instead of reporting them
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::NotFound(_))
    }

    /// Returns true if the error is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Result type for browser operations
pub type BrowserResult<T> = Result<T, BrowserError>;

/// Capability set the crawler needs from a browser
///
/// Every call blocks until it completes or its timeout budget runs out.
/// Selectors are CSS selectors.
pub trait BrowserSession {
    /// Loads `url` in the current tab and waits for the load to finish
    fn navigate(&mut self, url: &str) -> BrowserResult<()>;

    /// Reloads the current page
    fn reload(&mut self) -> BrowserResult<()>;

    /// Waits until an element matching `selector` exists in the page
    fn wait_until_present(&mut self, selector: &str, timeout: Duration) -> BrowserResult<()>;

    /// Waits until an element matching `selector` is visible and enabled
    fn wait_until_clickable(&mut self, selector: &str, timeout: Duration) -> BrowserResult<()>;

    /// Clicks the first element matching `selector`
    fn click(&mut self, selector: &str) -> BrowserResult<()>;

    /// Returns the current rendered HTML of the page
    fn page_source(&mut self) -> BrowserResult<String>;

    /// Goes one step back in the tab's history
    fn navigate_back(&mut self) -> BrowserResult<()>;

    /// Releases the browser; later calls fail with `BrowserError::Closed`
    fn quit(&mut self) -> BrowserResult<()>;

    /// Pauses so client-side rendering can settle after a navigation
    fn settle(&mut self, delay: Duration) {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}
