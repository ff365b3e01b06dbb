//! Settings for Workshop Harvest
//!
//! This module handles loading, parsing, and validating the TOML settings file.
//!
//! # Example
//!
//! ```no_run
//! use workshop_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("settings.toml")).unwrap();
//! println!("Writing rows to table: {}", config.output.table);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CatalogConfig, Config, DatabaseConfig, HttpConfig, OutputConfig, OutputMode};

// Re-export parser functions
pub use parser::{
    apply_overrides, compute_config_hash, load_config, load_config_with_hash, parse_config,
};

pub use validation::validate;
