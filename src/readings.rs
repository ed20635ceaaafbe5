//! Parsing of user-entered odometer and fuel readings

use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ReadingError {
    #[error("value is empty")]
    Empty,

    #[error("not a number: {0}")]
    NotANumber(String),

    #[error("last odometer ({last}) must be lower than current odometer ({current})")]
    OdometerNotIncreasing { last: f64, current: f64 },

    #[error("fuel amount must be greater than zero, got {0}")]
    NoFuel(f64),
}

/// A numeric reading typed by the user.
///
/// Accepts a decimal comma (`"10,5"`) as well as a decimal point.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Reading(pub f64);

impl Reading {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl FromStr for Reading {
    type Err = ReadingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ReadingError::Empty);
        }

        let normalized = s.replace(',', ".");
        match normalized.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Reading(value)),
            _ => Err(ReadingError::NotANumber(s.to_string())),
        }
    }
}

/// Parse a single reading
pub fn parse_reading(text: &str) -> Result<f64, ReadingError> {
    text.parse::<Reading>().map(|r| r.value())
}

/// Validated readings for one fill-up, ready for the store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillUpInput {
    pub km_last: f64,
    pub km_current: f64,
    pub fuel: f64,
}

impl FillUpInput {
    pub fn new(km_last: f64, km_current: f64, fuel: f64) -> Result<Self, ReadingError> {
        if km_last >= km_current {
            return Err(ReadingError::OdometerNotIncreasing {
                last: km_last,
                current: km_current,
            });
        }
        if fuel <= 0.0 {
            return Err(ReadingError::NoFuel(fuel));
        }
        Ok(Self {
            km_last,
            km_current,
            fuel,
        })
    }

    /// Parse three text fields the way a fill-up form submits them
    pub fn parse(km_last: &str, km_current: &str, fuel: &str) -> Result<Self, ReadingError> {
        Self::new(
            parse_reading(km_last)?,
            parse_reading(km_current)?,
            parse_reading(fuel)?,
        )
    }
}
