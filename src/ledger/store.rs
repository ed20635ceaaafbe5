use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use tracing::{debug, error, info, warn};

use super::error::{LedgerError, Result};
use super::models::{
    FillUp, LEGACY_INVALID_NAMES, RESERVED_NAMES, Vehicle, date_stamp, efficiency, normalize_name,
};
use super::retention::{self, DEFAULT_MAX_RECORDS};
use super::schema::{self, RECORD_COLUMNS};

/// Default wait for a file locked by another process
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(10);

/// Tunables applied when opening a ledger
#[derive(Debug, Clone)]
pub struct LedgerOptions {
    pub busy_timeout: Duration,
    /// Global cap on stored fill-up records
    pub max_records: u32,
    pub reserved_names: Vec<String>,
    pub legacy_invalid_names: Vec<String>,
}

impl Default for LedgerOptions {
    fn default() -> Self {
        Self {
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            max_records: DEFAULT_MAX_RECORDS,
            reserved_names: RESERVED_NAMES.iter().map(|s| s.to_string()).collect(),
            legacy_invalid_names: LEGACY_INVALID_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// SQLite-backed store for vehicles and their fill-up records
///
/// Holds one exclusive connection. Every multi-statement mutation runs in a
/// single transaction, so a failure leaves the file as it was.
pub struct FuelLedger {
    conn: Option<Connection>,
    path: PathBuf,
    options: LedgerOptions,
}

impl FuelLedger {
    /// Open or create a ledger at the given path with default options
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, LedgerOptions::default())
    }

    pub fn open_with<P: AsRef<Path>>(path: P, options: LedgerOptions) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening fuel ledger at: {}", path.display());

        let unavailable = |source: Box<dyn std::error::Error + Send + Sync>| {
            error!(path = %path.display(), %source, "Fuel ledger unavailable");
            LedgerError::StorageUnavailable {
                path: path.to_path_buf(),
                source,
            }
        };

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|err| unavailable(err.into()))?;
            }
        }

        let conn = Connection::open(path).map_err(|err| unavailable(err.into()))?;
        conn.busy_timeout(options.busy_timeout)
            .map_err(|err| unavailable(err.into()))?;
        schema::apply(&conn).map_err(|err| unavailable(err.into()))?;

        info!("Fuel ledger opened successfully");
        Ok(Self {
            conn: Some(conn),
            path: path.to_path_buf(),
            options,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &LedgerOptions {
        &self.options
    }

    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(LedgerError::Closed)
    }

    /// Register a vehicle under a trimmed, unique, non-placeholder name
    pub fn add_vehicle(&mut self, name: &str) -> Result<Vehicle> {
        self.try_add_vehicle(name)
            .inspect_err(|err| report("add_vehicle", err))
    }

    fn try_add_vehicle(&mut self, name: &str) -> Result<Vehicle> {
        let name = normalize_name(name, self.options.reserved_names.as_slice())
            .ok_or_else(|| LedgerError::InvalidVehicleName(name.trim().to_string()))?;

        let conn = self.conn.as_mut().ok_or(LedgerError::Closed)?;
        let tx = conn.transaction()?;

        let existing = tx
            .query_row("SELECT id FROM cars WHERE name = ?1", params![name], |row| {
                row.get::<_, i64>(0)
            })
            .optional()?;
        if existing.is_some() {
            return Err(LedgerError::DuplicateVehicle(name));
        }

        tx.execute("INSERT INTO cars (name) VALUES (?1)", params![name])?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        info!(id, name = %name, "Vehicle added");
        Ok(Vehicle { id, name })
    }

    /// All vehicles, oldest first
    pub fn list_vehicles(&self) -> Result<Vec<Vehicle>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name FROM cars ORDER BY id")?;
        let vehicles = stmt
            .query_map([], Vehicle::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!(count = vehicles.len(), "Listed vehicles");
        Ok(vehicles)
    }

    /// Look up a vehicle by its exact (trimmed) name
    pub fn find_vehicle(&self, name: &str) -> Result<Option<Vehicle>> {
        let conn = self.conn()?;
        let vehicle = conn
            .query_row(
                "SELECT id, name FROM cars WHERE name = ?1 ORDER BY id LIMIT 1",
                params![name.trim()],
                Vehicle::from_row,
            )
            .optional()?;
        Ok(vehicle)
    }

    /// Remove a vehicle together with its records.
    ///
    /// Returns `false` when no vehicle has that id.
    pub fn delete_vehicle(&mut self, id: i64) -> Result<bool> {
        self.try_delete_vehicle(id)
            .inspect_err(|err| report("delete_vehicle", err))
    }

    fn try_delete_vehicle(&mut self, id: i64) -> Result<bool> {
        let conn = self.conn.as_mut().ok_or(LedgerError::Closed)?;
        let tx = conn.transaction()?;

        // Records first: no fill-up may outlive its vehicle
        let records = tx.execute("DELETE FROM fuel_records WHERE car_id = ?1", params![id])?;
        let removed = tx.execute("DELETE FROM cars WHERE id = ?1", params![id])?;
        tx.commit()?;

        if removed == 0 {
            warn!(id, "Vehicle not found, nothing deleted");
            return Ok(false);
        }

        info!(id, records, "Vehicle deleted");
        Ok(true)
    }

    /// Odometer reading of the vehicle's most recent fill-up
    pub fn get_last_odometer(&self, car_id: i64) -> Result<Option<f64>> {
        let conn = self.conn()?;
        let km = conn
            .query_row(
                "SELECT km_current FROM fuel_records WHERE car_id = ?1 ORDER BY id DESC LIMIT 1",
                params![car_id],
                |row| row.get::<_, f64>(0),
            )
            .optional()?;

        debug!(car_id, ?km, "Fetched last odometer");
        Ok(km)
    }

    /// Store a fill-up and apply the retention cap in one transaction
    pub fn insert_fill_up(
        &mut self,
        car_id: i64,
        km_last: f64,
        km_current: f64,
        fuel: f64,
    ) -> Result<FillUp> {
        self.try_insert_fill_up(car_id, km_last, km_current, fuel)
            .inspect_err(|err| report("insert_fill_up", err))
    }

    fn try_insert_fill_up(
        &mut self,
        car_id: i64,
        km_last: f64,
        km_current: f64,
        fuel: f64,
    ) -> Result<FillUp> {
        let km_per_liter = efficiency(km_last, km_current, fuel)?;
        let max_records = self.options.max_records;

        let conn = self.conn.as_mut().ok_or(LedgerError::Closed)?;
        let tx = conn.transaction()?;

        if !vehicle_exists(&tx, car_id)? {
            return Err(LedgerError::UnknownVehicle(car_id));
        }

        let date = date_stamp(Local::now().date_naive());
        tx.execute(
            "INSERT INTO fuel_records (car_id, date, km_last, km_current, fuel, km_per_liter)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![car_id, date, km_last, km_current, fuel, km_per_liter],
        )?;
        let id = tx.last_insert_rowid();
        let pruned = retention::enforce(&tx, max_records)?;
        tx.commit()?;

        info!(id, car_id, km_per_liter, pruned, "Fill-up recorded");
        Ok(FillUp {
            id,
            car_id,
            date,
            km_last,
            km_current,
            fuel,
            km_per_liter,
        })
    }

    /// Stored records of a vehicle, oldest first.
    ///
    /// An unknown vehicle yields an empty history.
    pub fn get_all_records(&self, car_id: i64) -> Result<Vec<FillUp>> {
        let conn = self.conn()?;
        if !vehicle_exists(conn, car_id)? {
            warn!(car_id, "Vehicle not found, no history");
            return Ok(Vec::new());
        }

        let sql =
            format!("SELECT {RECORD_COLUMNS} FROM fuel_records WHERE car_id = ?1 ORDER BY id");
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![car_id], FillUp::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!(car_id, count = records.len(), "Fetched history");
        Ok(records)
    }

    /// Delete vehicles carrying known-bad legacy names.
    ///
    /// Their records are left in place.
    pub fn remove_invalid_vehicles(&mut self) -> Result<usize> {
        self.try_remove_invalid_vehicles()
            .inspect_err(|err| report("remove_invalid_vehicles", err))
    }

    fn try_remove_invalid_vehicles(&mut self) -> Result<usize> {
        let names = &self.options.legacy_invalid_names;
        if names.is_empty() {
            return Ok(0);
        }

        let conn = self.conn.as_ref().ok_or(LedgerError::Closed)?;
        let placeholders = vec!["?"; names.len()].join(", ");
        let sql = format!("DELETE FROM cars WHERE name IN ({placeholders})");
        let removed = conn.execute(&sql, params_from_iter(names.iter()))?;

        info!(removed, "Invalid vehicles removed");
        Ok(removed)
    }

    /// Get row counts (for debugging/monitoring)
    pub fn stats(&self) -> Result<StoreStats> {
        let conn = self.conn()?;
        let count = |table: &str| -> rusqlite::Result<usize> {
            let sql = format!("SELECT COUNT(*) FROM {table}");
            conn.query_row(&sql, [], |row| row.get::<_, i64>(0))
                .map(|n| n as usize)
        };

        Ok(StoreStats {
            vehicle_count: count("cars")?,
            record_count: count("fuel_records")?,
        })
    }

    /// Release the connection. Calling it again is a no-op.
    pub fn close(&mut self) -> Result<()> {
        match self.conn.take() {
            Some(conn) => {
                conn.close().map_err(|(_, err)| LedgerError::Storage(err))?;
                info!("Fuel ledger closed: {}", self.path.display());
            }
            None => debug!("Fuel ledger already closed"),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub vehicle_count: usize,
    pub record_count: usize,
}

fn vehicle_exists(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    conn.query_row("SELECT 1 FROM cars WHERE id = ?1", params![id], |_| Ok(()))
        .optional()
        .map(|found| found.is_some())
}

fn report(operation: &'static str, err: &LedgerError) {
    if err.is_rejection() {
        warn!(operation, %err, "Operation rejected");
    } else {
        error!(operation, %err, "Operation failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (FuelLedger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FuelLedger::open(temp_dir.path().join("fuel.db")).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_open_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = FuelLedger::open(temp_dir.path().join("nested/dir/fuel.db"));
        assert!(store.is_ok());
    }

    #[test]
    fn test_open_unavailable_location() {
        let temp_dir = TempDir::new().unwrap();
        // A directory cannot be opened as a database file
        let result = FuelLedger::open(temp_dir.path());
        assert!(matches!(
            result,
            Err(LedgerError::StorageUnavailable { .. })
        ));
    }

    #[test]
    fn test_open_under_regular_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("not-a-dir");
        std::fs::write(&file, b"plain file").unwrap();

        let result = FuelLedger::open(file.join("sub/fuel.db"));
        assert!(matches!(
            result,
            Err(LedgerError::StorageUnavailable { .. })
        ));
    }

    #[test]
    fn test_add_and_list_vehicles() {
        let (mut store, _temp) = create_test_store();

        let first = store.add_vehicle(" ABC-1234 ").unwrap();
        let second = store.add_vehicle("XYZ-9876").unwrap();

        assert_eq!(first.name, "ABC-1234");
        assert!(second.id > first.id);
        assert_eq!(store.list_vehicles().unwrap(), vec![first, second]);
    }

    #[test]
    fn test_duplicate_is_case_sensitive() {
        let (mut store, _temp) = create_test_store();

        store.add_vehicle("abc-1234").unwrap();
        assert!(store.add_vehicle("ABC-1234").is_ok());
        assert!(matches!(
            store.add_vehicle("abc-1234"),
            Err(LedgerError::DuplicateVehicle(_))
        ));
        assert_eq!(store.list_vehicles().unwrap().len(), 2);
    }

    #[test]
    fn test_find_vehicle() {
        let (mut store, _temp) = create_test_store();
        let added = store.add_vehicle("ABC-1234").unwrap();

        assert_eq!(store.find_vehicle("ABC-1234").unwrap(), Some(added));
        assert_eq!(store.find_vehicle("missing").unwrap(), None);
    }

    #[test]
    fn test_insert_returns_stored_record() {
        let (mut store, _temp) = create_test_store();
        let car = store.add_vehicle("ABC-1234").unwrap();

        let record = store.insert_fill_up(car.id, 1000.0, 1300.0, 25.0).unwrap();

        assert_eq!(record.car_id, car.id);
        assert!((record.km_per_liter - 12.0).abs() < 1e-9);
        assert_eq!(record.date.len(), 5);
        assert_eq!(store.get_all_records(car.id).unwrap(), vec![record]);
    }

    #[test]
    fn test_insert_unknown_vehicle_is_rejected() {
        let (mut store, _temp) = create_test_store();

        let err = store.insert_fill_up(42, 100.0, 150.0, 10.0).unwrap_err();

        assert!(matches!(err, LedgerError::UnknownVehicle(42)));
        assert_eq!(store.stats().unwrap().record_count, 0);
    }

    #[test]
    fn test_insert_zero_fuel_leaves_state_untouched() {
        let (mut store, _temp) = create_test_store();
        let car = store.add_vehicle("ABC-1234").unwrap();

        let err = store.insert_fill_up(car.id, 100.0, 150.0, 0.0).unwrap_err();

        assert!(err.is_rejection());
        assert!(store.get_all_records(car.id).unwrap().is_empty());
    }

    #[test]
    fn test_delete_missing_vehicle() {
        let (mut store, _temp) = create_test_store();
        assert!(!store.delete_vehicle(99).unwrap());
    }

    #[test]
    fn test_last_odometer_none_without_records() {
        let (mut store, _temp) = create_test_store();
        let car = store.add_vehicle("ABC-1234").unwrap();
        assert_eq!(store.get_last_odometer(car.id).unwrap(), None);
    }

    #[test]
    fn test_custom_retention_cap() {
        let temp_dir = TempDir::new().unwrap();
        let options = LedgerOptions {
            max_records: 1,
            ..LedgerOptions::default()
        };
        let mut store = FuelLedger::open_with(temp_dir.path().join("fuel.db"), options).unwrap();
        let car = store.add_vehicle("ABC-1234").unwrap();

        store.insert_fill_up(car.id, 0.0, 100.0, 10.0).unwrap();
        let latest = store.insert_fill_up(car.id, 100.0, 200.0, 10.0).unwrap();

        assert_eq!(store.get_all_records(car.id).unwrap(), vec![latest]);
    }

    #[test]
    fn test_zero_retention_cap_keeps_new_record() {
        let temp_dir = TempDir::new().unwrap();
        let options = LedgerOptions {
            max_records: 0,
            ..LedgerOptions::default()
        };
        let mut store = FuelLedger::open_with(temp_dir.path().join("fuel.db"), options).unwrap();
        let car = store.add_vehicle("ABC-1234").unwrap();

        store.insert_fill_up(car.id, 0.0, 100.0, 10.0).unwrap();
        let latest = store.insert_fill_up(car.id, 100.0, 200.0, 10.0).unwrap();

        assert_eq!(store.get_all_records(car.id).unwrap(), vec![latest]);
    }

    #[test]
    fn test_stats() {
        let (mut store, _temp) = create_test_store();
        let car = store.add_vehicle("ABC-1234").unwrap();
        store.insert_fill_up(car.id, 0.0, 100.0, 10.0).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.vehicle_count, 1);
        assert_eq!(stats.record_count, 1);
    }

    #[test]
    fn test_close_is_idempotent() {
        let (mut store, _temp) = create_test_store();

        store.close().unwrap();
        store.close().unwrap();

        assert!(store.is_closed());
        assert!(matches!(store.list_vehicles(), Err(LedgerError::Closed)));
        assert!(matches!(
            store.add_vehicle("ABC-1234"),
            Err(LedgerError::Closed)
        ));
    }
}
