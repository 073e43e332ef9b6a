use crate::config::types::{
    BrowserConfig, Config, OutputConfig, SearchConfig, SelectorConfig, TimeoutConfig,
};
use crate::crawler::Selectors;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_search_config(&config.search)?;
    validate_browser_config(&config.browser)?;
    validate_timeout_config(&config.timeouts)?;
    validate_selector_config(&config.selectors)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the search target
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    if config.location.trim().is_empty() {
        return Err(ConfigError::Validation(
            "location cannot be empty".to_string(),
        ));
    }

    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    if !config.search_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "search_path must start with '/', got '{}'",
            config.search_path
        )));
    }

    Ok(())
}

/// Validates browser launch options
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.page_load_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "page_load_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.window_width == 0 || config.window_height == 0 {
        return Err(ConfigError::Validation(format!(
            "window size must be non-zero, got {}x{}",
            config.window_width, config.window_height
        )));
    }

    Ok(())
}

/// Validates wait budgets
///
/// Settle delays and the consent wait may be zero; the ready waits may not.
fn validate_timeout_config(config: &TimeoutConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("list_ready_ms", config.list_ready_ms),
        ("detail_ready_ms", config.detail_ready_ms),
        ("pagination_list_ms", config.pagination_list_ms),
        ("next_button_ms", config.next_button_ms),
    ] {
        if value == 0 {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 1ms, got 0",
                name
            )));
        }
    }

    if config.pagination_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "pagination_retries must be <= 10, got {}",
            config.pagination_retries
        )));
    }

    Ok(())
}

/// Validates that every selector is well-formed CSS
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    Selectors::compile(config)?;
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation("output path cannot be empty".to_string()));
    }

    Ok(())
}
