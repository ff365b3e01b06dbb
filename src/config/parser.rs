use crate::config::types::{Config, OutputMode};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a settings file from the given path
///
/// Every section is optional and falls back to its defaults, but the file
/// itself must exist and be valid TOML.
///
/// # Arguments
///
/// * `path` - Path to the TOML settings file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated settings
/// * `Err(ConfigError)` - Failed to read, parse, or validate the settings
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use workshop_harvest::config::load_config;
///
/// let config = load_config(Path::new("settings.toml")).unwrap();
/// println!("App id: {}", config.catalog.app_id);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates settings from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the settings file content
///
/// Logged at startup so a dump can be traced back to the settings that produced it.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Applies command-line overrides and validates the result again
///
/// # Arguments
///
/// * `config` - Settings loaded from the file
/// * `mode` - Output mode to use instead of the configured one
/// * `max_pages` - Page limit to use instead of the configured one
///
/// # Returns
///
/// * `Ok(())` - Overrides applied and the settings are still valid
/// * `Err(ConfigError)` - The overridden settings fail validation
pub fn apply_overrides(
    config: &mut Config,
    mode: Option<OutputMode>,
    max_pages: Option<u32>,
) -> Result<(), ConfigError> {
    if let Some(mode) = mode {
        config.output.mode = mode;
    }
    if let Some(max_pages) = max_pages {
        config.catalog.max_pages = max_pages;
    }
    validate(config)
}
