use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::ledger::{
    DEFAULT_BUSY_TIMEOUT, DEFAULT_MAX_RECORDS, LEGACY_INVALID_NAMES, LedgerOptions, RESERVED_NAMES,
};

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub retention: RetentionConfig,
    #[serde(default)]
    pub vehicles: VehicleConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Options for opening the ledger described by this configuration
    pub fn ledger_options(&self) -> LedgerOptions {
        LedgerOptions {
            busy_timeout: Duration::from_millis(self.storage.busy_timeout_ms),
            max_records: self.retention.max_records,
            reserved_names: self.vehicles.reserved_names.clone(),
            legacy_invalid_names: self.vehicles.legacy_invalid_names.clone(),
        }
    }
}

/// Ledger file location and locking
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_path")]
    pub path: PathBuf,
    /// How long to wait on a file locked by another process
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

fn default_path() -> PathBuf {
    PathBuf::from("fuel_data.db")
}

fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT.as_millis() as u64
}

/// Retention configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetentionConfig {
    /// Global cap on fill-up records kept after each insert
    #[serde(default = "default_max_records")]
    pub max_records: u32,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            max_records: default_max_records(),
        }
    }
}

fn default_max_records() -> u32 {
    DEFAULT_MAX_RECORDS
}

/// Vehicle name rules
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VehicleConfig {
    /// Placeholders rejected by add-vehicle
    #[serde(default = "default_reserved_names")]
    pub reserved_names: Vec<String>,
    /// Names deleted by the cleanup pass
    #[serde(default = "default_legacy_invalid_names")]
    pub legacy_invalid_names: Vec<String>,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            reserved_names: default_reserved_names(),
            legacy_invalid_names: default_legacy_invalid_names(),
        }
    }
}

fn default_reserved_names() -> Vec<String> {
    RESERVED_NAMES.iter().map(|s| s.to_string()).collect()
}

fn default_legacy_invalid_names() -> Vec<String> {
    LEGACY_INVALID_NAMES.iter().map(|s| s.to_string()).collect()
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
