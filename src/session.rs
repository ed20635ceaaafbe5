//! Caller-side state of the fill-up form
//!
//! The selected vehicle and the last known odometer live here, owned by
//! whoever drives the store, and are refreshed from the ledger after every
//! selection and every saved fill-up.

use thiserror::Error;
use tracing::debug;

use crate::ledger::{FillUp, FuelLedger, LedgerError, Vehicle};
use crate::readings::{FillUpInput, ReadingError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("please select a vehicle")]
    NoVehicleSelected,

    #[error("vehicle {0} not found")]
    UnknownVehicle(String),

    #[error(transparent)]
    Reading(#[from] ReadingError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

pub struct Session {
    ledger: FuelLedger,
    selected: Option<Vehicle>,
    last_odometer: f64,
}

impl Session {
    pub fn new(ledger: FuelLedger) -> Self {
        Self {
            ledger,
            selected: None,
            last_odometer: 0.0,
        }
    }

    pub fn ledger(&self) -> &FuelLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut FuelLedger {
        &mut self.ledger
    }

    pub fn selected(&self) -> Option<&Vehicle> {
        self.selected.as_ref()
    }

    /// Odometer to prefill as "last reading"; zero when nothing is known
    pub fn last_odometer(&self) -> f64 {
        self.last_odometer
    }

    /// Select a vehicle by name and load its last odometer reading
    pub fn select(&mut self, name: &str) -> Result<&Vehicle> {
        let vehicle = self
            .ledger
            .find_vehicle(name)?
            .ok_or_else(|| SessionError::UnknownVehicle(name.trim().to_string()))?;

        self.selected = Some(vehicle);
        self.refresh_last_odometer()?;
        self.selected.as_ref().ok_or(SessionError::NoVehicleSelected)
    }

    pub fn refresh_last_odometer(&mut self) -> Result<f64> {
        self.last_odometer = match &self.selected {
            Some(vehicle) => self.ledger.get_last_odometer(vehicle.id)?.unwrap_or(0.0),
            None => 0.0,
        };
        debug!(last_odometer = self.last_odometer, "Last odometer refreshed");
        Ok(self.last_odometer)
    }

    pub fn add_vehicle(&mut self, name: &str) -> Result<Vehicle> {
        let vehicle = self.ledger.add_vehicle(name)?;
        self.refresh_last_odometer()?;
        Ok(vehicle)
    }

    /// Parse and validate form fields, then store the fill-up for the
    /// selected vehicle. The new odometer becomes the next "last reading".
    pub fn record_fill_up(&mut self, km_last: &str, km_current: &str, fuel: &str) -> Result<FillUp> {
        if self.selected.is_none() {
            return Err(SessionError::NoVehicleSelected);
        }
        let input = FillUpInput::parse(km_last, km_current, fuel)?;
        self.record(input)
    }

    /// Store already validated readings for the selected vehicle
    pub fn record(&mut self, input: FillUpInput) -> Result<FillUp> {
        let car_id = self
            .selected
            .as_ref()
            .map(|v| v.id)
            .ok_or(SessionError::NoVehicleSelected)?;

        let record =
            self.ledger
                .insert_fill_up(car_id, input.km_last, input.km_current, input.fuel)?;

        self.last_odometer = record.km_current;
        Ok(record)
    }

    /// History of the selected vehicle
    pub fn history(&self) -> Result<Vec<FillUp>> {
        let vehicle = self.selected.as_ref().ok_or(SessionError::NoVehicleSelected)?;
        Ok(self.ledger.get_all_records(vehicle.id)?)
    }

    pub fn close(mut self) -> Result<()> {
        self.ledger.close()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_session() -> (Session, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let ledger = FuelLedger::open(temp_dir.path().join("fuel.db")).unwrap();
        (Session::new(ledger), temp_dir)
    }

    #[test]
    fn test_fill_up_requires_selection() {
        let (mut session, _temp) = create_test_session();
        session.add_vehicle("ABC-1234").unwrap();

        let err = session.record_fill_up("0", "100", "10").unwrap_err();
        assert!(matches!(err, SessionError::NoVehicleSelected));
    }

    #[test]
    fn test_select_unknown_vehicle() {
        let (mut session, _temp) = create_test_session();
        assert!(matches!(
            session.select("ghost"),
            Err(SessionError::UnknownVehicle(_))
        ));
        assert!(session.selected().is_none());
    }

    #[test]
    fn test_last_odometer_follows_fill_ups() {
        let (mut session, _temp) = create_test_session();
        session.add_vehicle("ABC-1234").unwrap();
        session.select("ABC-1234").unwrap();
        assert_eq!(session.last_odometer(), 0.0);

        let record = session.record_fill_up("1000", "1250,5", "20").unwrap();
        assert_eq!(record.km_current, 1250.5);
        assert_eq!(session.last_odometer(), 1250.5);

        // A fresh selection reads the same value back from the ledger
        session.select("ABC-1234").unwrap();
        assert_eq!(session.last_odometer(), 1250.5);
    }

    #[test]
    fn test_invalid_readings_do_not_store() {
        let (mut session, _temp) = create_test_session();
        session.add_vehicle("ABC-1234").unwrap();
        session.select("ABC-1234").unwrap();

        assert!(matches!(
            session.record_fill_up("200", "100", "10"),
            Err(SessionError::Reading(ReadingError::OdometerNotIncreasing { .. }))
        ));
        assert!(matches!(
            session.record_fill_up("abc", "100", "10"),
            Err(SessionError::Reading(ReadingError::NotANumber(_)))
        ));
        assert!(session.history().unwrap().is_empty());
    }

    #[test]
    fn test_close() {
        let (session, _temp) = create_test_session();
        assert!(session.close().is_ok());
    }
}
