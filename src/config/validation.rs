use super::models::Config;
use thiserror::Error;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Storage path must not be empty")]
    EmptyStoragePath,

    #[error("Busy timeout must be positive")]
    InvalidBusyTimeout,

    #[error("Retention must keep at least one record, got max_records = {0}")]
    InvalidRetention(u32),

    #[error("Vehicle name list '{list}' contains a blank entry")]
    BlankVehicleName { list: &'static str },

    #[error("Unknown log level '{0}'")]
    InvalidLogLevel(String),
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_storage(config)?;
    validate_retention(config)?;
    validate_vehicles(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_storage(config: &Config) -> Result<(), ValidationError> {
    if config.storage.path.as_os_str().is_empty() {
        return Err(ValidationError::EmptyStoragePath);
    }
    if config.storage.busy_timeout_ms == 0 {
        return Err(ValidationError::InvalidBusyTimeout);
    }
    Ok(())
}

fn validate_retention(config: &Config) -> Result<(), ValidationError> {
    if config.retention.max_records == 0 {
        return Err(ValidationError::InvalidRetention(0));
    }
    Ok(())
}

fn validate_vehicles(config: &Config) -> Result<(), ValidationError> {
    let lists = [
        ("reserved_names", &config.vehicles.reserved_names),
        ("legacy_invalid_names", &config.vehicles.legacy_invalid_names),
    ];

    for (list, names) in lists {
        if names.iter().any(|name| name.trim().is_empty()) {
            return Err(ValidationError::BlankVehicleName { list });
        }
    }
    Ok(())
}

/// The level is used as an `EnvFilter` fallback; only bare levels are accepted
fn validate_logging(config: &Config) -> Result<(), ValidationError> {
    let level = config.logging.level.trim().to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(ValidationError::InvalidLogLevel(config.logging.level.clone()));
    }
    Ok(())
}
