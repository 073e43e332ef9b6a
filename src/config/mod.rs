//! Configuration module for Hotel-Harvest
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file and merging it with command-line overrides.
//!
//! # Example
//!
//! ```no_run
//! use hotel_harvest::config::{resolve_config, Overrides};
//! use std::path::Path;
//!
//! let (config, _hash) = resolve_config(Some(Path::new("harvest.toml")), &Overrides::default()).unwrap();
//! println!("Collecting hotels in: {}", config.search.location);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, Config, OutputConfig, SearchConfig, SelectorConfig, TimeoutConfig,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, resolve_config, Overrides,
};
