use chrono::NaiveDate;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::error::{LedgerError, Result};

/// Placeholder strings a vehicle selector shows when nothing is selected
pub const RESERVED_NAMES: &[&str] = &["Selecione o Veículo", "Clique para selecionar", "s"];

/// Names left behind by earlier releases that the cleanup pass removes
pub const LEGACY_INVALID_NAMES: &[&str] = &["Meu Carro", "Selecione o Veículo", "s"];

/// Day-month stamp stored with each record (no year)
pub const DATE_FORMAT: &str = "%d-%m";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: i64,
    pub name: String,
}

impl Vehicle {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            // Older files never constrained the column
            name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        })
    }
}

/// One fueling event with its derived efficiency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillUp {
    pub id: i64,
    pub car_id: i64,
    pub date: String,
    pub km_last: f64,
    pub km_current: f64,
    pub fuel: f64,
    pub km_per_liter: f64,
}

impl FillUp {
    /// Map a row selected with `schema::RECORD_COLUMNS`
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            car_id: row.get(1)?,
            date: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            km_last: row.get(3)?,
            km_current: row.get(4)?,
            fuel: row.get(5)?,
            km_per_liter: row.get(6)?,
        })
    }

    pub fn distance(&self) -> f64 {
        self.km_current - self.km_last
    }
}

/// Trim a candidate vehicle name and reject blanks and placeholders
pub fn normalize_name<S: AsRef<str>>(name: &str, reserved: &[S]) -> Option<String> {
    let name = name.trim();
    if name.is_empty() || reserved.iter().any(|r| r.as_ref() == name) {
        return None;
    }
    Some(name.to_string())
}

/// Distance per unit of fuel for a fill-up, after checking the readings
pub fn efficiency(km_last: f64, km_current: f64, fuel: f64) -> Result<f64> {
    if !(km_last.is_finite() && km_current.is_finite() && fuel.is_finite()) {
        return Err(LedgerError::InvalidReading(
            "readings must be finite numbers".to_string(),
        ));
    }
    if fuel <= 0.0 {
        return Err(LedgerError::InvalidReading(format!(
            "fuel must be greater than zero, got {fuel}"
        )));
    }
    if km_current <= km_last {
        return Err(LedgerError::InvalidReading(format!(
            "current odometer {km_current} must be greater than last odometer {km_last}"
        )));
    }
    Ok((km_current - km_last) / fuel)
}

pub fn date_stamp(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
