/// Table layout for the SQLite ledger file
///
/// - `cars`: id -> name
/// - `fuel_records`: id -> (car_id, date, km_last, km_current, fuel, km_per_liter)
///
/// Statements use `IF NOT EXISTS` so applying the schema is safe on every
/// open, including files written before ids were declared `AUTOINCREMENT`.
/// Foreign-key enforcement is switched off explicitly, since bundled SQLite
/// builds turn it on by default: the legacy-name cleanup must be able to drop
/// a vehicle that still has records. Referential checks happen in the store.
use rusqlite::Connection;

pub const SCHEMA_SQL: &str = r#"
PRAGMA foreign_keys = OFF;

CREATE TABLE IF NOT EXISTS cars (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT
);

CREATE TABLE IF NOT EXISTS fuel_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    car_id INTEGER,
    date TEXT,
    km_last REAL,
    km_current REAL,
    fuel REAL,
    km_per_liter REAL,
    FOREIGN KEY (car_id) REFERENCES cars(id)
);
"#;

/// Column list shared by every record query, in `FillUp` field order.
pub const RECORD_COLUMNS: &str = "id, car_id, date, km_last, km_current, fuel, km_per_liter";

/// Create missing tables
pub fn apply(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
