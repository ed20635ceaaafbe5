//! Configuration management for the fuel ledger
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use fuel_ledger::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Ledger file: {}", config.storage.path.display());
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `FUEL_LEDGER__<section>__<key>`
//!
//! Examples:
//! - `FUEL_LEDGER__STORAGE__PATH=/data/fuel.db`
//! - `FUEL_LEDGER__RETENTION__MAX_RECORDS=3`
//! - `FUEL_LEDGER__LOGGING__LEVEL=debug`
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/fuel-ledger.toml`.
//! This can be overridden using the `FUEL_LEDGER_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

// Re-export public types
pub use models::{Config, LoggingConfig, RetentionConfig, StorageConfig, VehicleConfig};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("Failed to render configuration: {0}")]
    RenderError(#[from] toml::ser::Error),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`FUEL_LEDGER__*`)
    /// 2. TOML file (default: `config/fuel-ledger.toml`)
    /// 3. Default values
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Environment overrides still apply on top of the file.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Effective configuration as TOML, suitable as a starting config file
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
