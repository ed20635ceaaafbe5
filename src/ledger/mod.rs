/// SQLite-based persistence layer for vehicles and fill-up records
///
/// This module owns the ledger file. It persists:
///
/// - Vehicles (`cars` table): unique, non-placeholder names
/// - Fill-up records (`fuel_records` table): odometer readings, fuel volume
///   and the km/L computed when the record was stored
///
/// ## Retention Policy
///
/// The history is intentionally short. Right after each insert, every record
/// outside the newest three (by id, across all vehicles) is deleted in the
/// same transaction. See [`retention`].
///
/// ## Known gaps
///
/// - Dates are stored as day-month without a year.
/// - [`FuelLedger::remove_invalid_vehicles`] does not delete the records of
///   the vehicles it removes, unlike [`FuelLedger::delete_vehicle`].
///
/// ## Usage
///
/// ```rust,no_run
/// use fuel_ledger::ledger::FuelLedger;
///
/// let mut store = FuelLedger::open("fuel_data.db")?;
/// let car = store.add_vehicle("ABC-1234")?;
/// store.insert_fill_up(car.id, 100.0, 150.0, 10.0)?;
/// let history = store.get_all_records(car.id)?;
/// store.close()?;
/// # Ok::<(), fuel_ledger::ledger::LedgerError>(())
/// ```

pub mod error;
pub mod models;
pub mod retention;
pub mod schema;
pub mod store;

pub use error::{LedgerError, Result};
pub use models::{FillUp, LEGACY_INVALID_NAMES, RESERVED_NAMES, Vehicle};
pub use retention::DEFAULT_MAX_RECORDS;
pub use store::{DEFAULT_BUSY_TIMEOUT, FuelLedger, LedgerOptions, StoreStats};
