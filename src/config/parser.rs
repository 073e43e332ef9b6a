use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Values supplied on the command line that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub location: Option<String>,
    pub max_hotels: Option<u64>,
    pub output_path: Option<String>,
    pub headful: bool,
}

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use hotel_harvest::config::load_config;
///
/// let config = load_config(Path::new("harvest.toml")).unwrap();
/// println!("Searching: {}", config.search.location);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so a CSV can be traced back to the settings that
/// produced it.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Builds the effective configuration for a run
///
/// Starts from the file at `path` (or the built-in defaults when no file is
/// given), applies the command-line overrides and validates the result.
///
/// # Returns
///
/// * `Ok((Config, Option<String>))` - The configuration and, if a file was
///   read, its hash
/// * `Err(ConfigError)` - The file could not be read or the result is invalid
pub fn resolve_config(
    path: Option<&Path>,
    overrides: &Overrides,
) -> Result<(Config, Option<String>), ConfigError> {
    let (mut config, hash) = match path {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)?;
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    if let Some(location) = &overrides.location {
        config.search.location = location.clone();
    }
    if overrides.max_hotels.is_some() {
        config.search.max_hotels = overrides.max_hotels;
    }
    if let Some(output_path) = &overrides.output_path {
        config.output.path = output_path.clone();
    }
    if overrides.headful {
        config.browser.headless = false;
    }

    validate(&config)?;
    Ok((config, hash))
}
