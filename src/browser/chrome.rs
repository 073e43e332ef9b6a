//! Headless Chrome implementation of `BrowserSession`
//!
//! Launches a local Chrome through the DevTools protocol and keeps a single
//! tab for the whole run.

use crate::browser::{BrowserError, BrowserResult, BrowserSession};
use crate::config::BrowserConfig;
use headless_chrome::util::Timeout;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Extra Chrome flags: no GPU, no images, no extensions
static CHROME_ARGS: [&str; 4] = [
    "--disable-gpu",
    "--disable-dev-shm-usage",
    "--blink-settings=imagesEnabled=false",
    "--disable-extensions",
];

/// How often clickability is re-checked while waiting
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Chrome stays alive between events for at most this long
const IDLE_BROWSER_TIMEOUT: Duration = Duration::from_secs(300);

const CLICKABLE_JS: &str = "function() { \
    const r = this.getBoundingClientRect(); \
    return !this.disabled && r.width > 0 && r.height > 0; \
}";

/// A browser session backed by a local Chrome process
pub struct ChromeSession {
    browser: Option<Browser>,
    tab: Option<Arc<Tab>>,
    page_load_timeout: Duration,
}

impl ChromeSession {
    /// Launches Chrome and opens the tab used for the whole crawl
    ///
    /// # Arguments
    ///
    /// * `config` - Window, headless and page-load settings
    ///
    /// # Returns
    ///
    /// * `Ok(ChromeSession)` - Chrome is running with one open tab
    /// * `Err(BrowserError)` - Chrome could not be found or started
    pub fn launch(config: &BrowserConfig) -> BrowserResult<Self> {
        let args: Vec<&OsStr> = CHROME_ARGS.iter().map(|arg| OsStr::new(*arg)).collect();

        let options = LaunchOptions {
            headless: config.headless,
            sandbox: false,
            window_size: Some((config.window_width, config.window_height)),
            idle_browser_timeout: IDLE_BROWSER_TIMEOUT,
            args,
            ..Default::default()
        };

        let browser = Browser::new(options).map_err(driver_error)?;
        let tab = browser.new_tab().map_err(driver_error)?;
        tab.set_default_timeout(config.page_load_timeout());

        tracing::debug!(
            "Chrome launched (headless: {}, window: {}x{})",
            config.headless,
            config.window_width,
            config.window_height
        );

        Ok(Self {
            browser: Some(browser),
            tab: Some(tab),
            page_load_timeout: config.page_load_timeout(),
        })
    }

    fn tab(&self) -> BrowserResult<&Arc<Tab>> {
        self.tab.as_ref().ok_or(BrowserError::Closed)
    }
}

impl BrowserSession for ChromeSession {
    fn navigate(&mut self, url: &str) -> BrowserResult<()> {
        let tab = self.tab()?;

        tab.navigate_to(url).map_err(|e| BrowserError::Navigation {
            url: url.to_string(),
            message: format!("{:#}", e),
        })?;

        tab.wait_until_navigated()
            .map_err(|e| wait_error(e, &format!("page load of {}", url), self.page_load_timeout))?;

        Ok(())
    }

    fn reload(&mut self) -> BrowserResult<()> {
        let tab = self.tab()?;

        tab.reload(false, None).map_err(driver_error)?;
        tab.wait_until_navigated()
            .map_err(|e| wait_error(e, "page reload", self.page_load_timeout))?;

        Ok(())
    }

    fn wait_until_present(&mut self, selector: &str, timeout: Duration) -> BrowserResult<()> {
        let tab = self.tab()?;

        tab.wait_for_element_with_custom_timeout(selector, timeout)
            .map(|_| ())
            .map_err(|e| wait_error(e, selector, timeout))
    }

    fn wait_until_clickable(&mut self, selector: &str, timeout: Duration) -> BrowserResult<()> {
        let tab = self.tab()?;
        let deadline = Instant::now() + timeout;

        loop {
            if let Ok(element) = tab.find_element(selector) {
                let clickable = element
                    .call_js_fn(CLICKABLE_JS, vec![], false)
                    .ok()
                    .and_then(|remote| remote.value)
                    .and_then(|value| value.as_bool())
                    .unwrap_or(false);

                if clickable {
                    return Ok(());
                }
            }

            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout {
                    what: format!("{} to become clickable", selector),
                    timeout,
                });
            }

            std::thread::sleep(POLL_INTERVAL);
        }
    }

    fn click(&mut self, selector: &str) -> BrowserResult<()> {
        let tab = self.tab()?;

        let element = tab
            .find_element(selector)
            .map_err(|_| BrowserError::NotFound(selector.to_string()))?;
        element.click().map_err(driver_error)?;

        Ok(())
    }

    fn page_source(&mut self) -> BrowserResult<String> {
        self.tab()?.get_content().map_err(driver_error)
    }

    fn navigate_back(&mut self) -> BrowserResult<()> {
        self.tab()?
            .evaluate("window.history.go(-1)", false)
            .map_err(|e| BrowserError::Script(format!("{:#}", e)))?;
        Ok(())
    }

    fn quit(&mut self) -> BrowserResult<()> {
        if let Some(tab) = self.tab.take() {
            if let Err(e) = tab.close(true) {
                tracing::debug!("Closing tab failed: {:#}", e);
            }
        }

        // Dropping the handle terminates the Chrome process
        if self.browser.take().is_some() {
            tracing::debug!("Chrome session released");
        }

        Ok(())
    }
}

fn driver_error(e: impl std::fmt::Display) -> BrowserError {
    BrowserError::Driver(e.to_string())
}

/// Only an expired wait is a `Timeout`; a dead tab or connection is a driver
/// failure
fn wait_error(e: anyhow::Error, what: &str, timeout: Duration) -> BrowserError {
    if e.downcast_ref::<Timeout>().is_some() {
        BrowserError::Timeout {
            what: what.to_string(),
            timeout,
        }
    } else {
        driver_error(format!("{:#}", e))
    }
}
