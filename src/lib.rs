//! Hotel-Harvest: a browser-driven hotel listing collector
//!
//! This crate drives a real browser through a travel-search results page,
//! visits every listing's detail view, deduplicates what it finds and writes
//! the records incrementally to a CSV file.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod output;
pub mod record;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Hotel-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser error: {0}")]
    Browser(#[from] browser::BrowserError),

    #[error("Output error: {0}")]
    Sink(#[from] output::SinkError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Invalid navigation transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::NavState,
        to: state::NavState,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector for {field}: {selector}")]
    InvalidSelector { field: &'static str, selector: String },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),
}

/// Result type alias for Hotel-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use record::{DetailFields, EnrichedRecord, IdentityKey, ListingSummary, NOT_AVAILABLE};
pub use state::{DedupStore, RunContext};
