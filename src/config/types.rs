use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Hotel-Harvest
///
/// Every table is optional; a missing table falls back to the values that
/// match the live travel-search site.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// What to search for and where
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Free-text location query
    pub location: String,

    /// Optional cap on the number of records collected
    #[serde(rename = "max-hotels")]
    pub max_hotels: Option<u64>,

    /// Scheme and host prefixed to every relative detail link
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the search results page on `base_url`
    #[serde(rename = "search-path")]
    pub search_path: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            location: "New York".to_string(),
            max_hotels: None,
            base_url: "https://www.google.com".to_string(),
            search_path: "/travel/search".to_string(),
        }
    }
}

/// Browser launch configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run Chrome without a visible window
    pub headless: bool,

    /// Budget for a single page load (seconds)
    #[serde(rename = "page-load-timeout-secs")]
    pub page_load_timeout_secs: u64,

    #[serde(rename = "window-width")]
    pub window_width: u32,

    #[serde(rename = "window-height")]
    pub window_height: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            page_load_timeout_secs: 30,
            window_width: 1920,
            window_height: 1080,
        }
    }
}

impl BrowserConfig {
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }
}

/// Wait budgets and settle delays (milliseconds)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Wait for the cookie consent control
    #[serde(rename = "consent-ms")]
    pub consent_ms: u64,

    /// Wait for the list container after a load or page change
    #[serde(rename = "list-ready-ms")]
    pub list_ready_ms: u64,

    /// Wait for the detail page marker
    #[serde(rename = "detail-ready-ms")]
    pub detail_ready_ms: u64,

    /// Wait for the list container before looking for the next control
    #[serde(rename = "pagination-list-ms")]
    pub pagination_list_ms: u64,

    /// Wait for the next control to become clickable
    #[serde(rename = "next-button-ms")]
    pub next_button_ms: u64,

    /// Pause after going back from a detail page
    #[serde(rename = "back-settle-ms")]
    pub back_settle_ms: u64,

    /// Pause after clicking the next control
    #[serde(rename = "page-settle-ms")]
    pub page_settle_ms: u64,

    /// Extra attempts at finding the next control before giving up
    #[serde(rename = "pagination-retries")]
    pub pagination_retries: u32,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            consent_ms: 5_000,
            list_ready_ms: 20_000,
            detail_ready_ms: 10_000,
            pagination_list_ms: 10_000,
            next_button_ms: 5_000,
            back_settle_ms: 200,
            page_settle_ms: 1_500,
            pagination_retries: 0,
        }
    }
}

/// CSS selectors for every structural marker the crawler relies on
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub card: String,
    pub name: String,
    pub price: String,
    pub rating: String,
    pub reviews: String,
    #[serde(rename = "detail-link")]
    pub detail_link: String,
    #[serde(rename = "list-marker")]
    pub list_marker: String,
    #[serde(rename = "detail-marker")]
    pub detail_marker: String,
    pub location: String,
    pub contact: String,
    pub consent: String,
    #[serde(rename = "next-first")]
    pub next_first: String,
    #[serde(rename = "next-subsequent")]
    pub next_subsequent: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            card: "div.BcKagd".to_string(),
            name: "h2.BgYkof".to_string(),
            price: "span.qQOQpe.prxS3d".to_string(),
            rating: "span.KFi5wf.lA0BZ".to_string(),
            reviews: "span.jdzyld.XLC8M".to_string(),
            detail_link: "a.PVOOXe".to_string(),
            list_marker: ".K1smNd".to_string(),
            detail_marker: ".gJGKuf".to_string(),
            location: r#"div[class="K4nuhf"] > span:nth-of-type(1)"#.to_string(),
            contact: r#"div[class="K4nuhf"] > span:nth-of-type(3)"#.to_string(),
            consent: r#"button[aria-label*="Accept"]"#.to_string(),
            next_first: "div.eGUU7b > button".to_string(),
            next_subsequent: "div.eGUU7b > button:nth-of-type(2)".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the CSV file, relative to the working directory
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "hotels_data.csv".to_string(),
        }
    }
}
