/// Retention policy for fill-up records
///
/// The cap is global: after each insert only the newest records by id are
/// kept, whichever vehicle they belong to.
use rusqlite::{Connection, params};
use tracing::debug;

/// Records kept after every insert (the new one plus the two before it)
pub const DEFAULT_MAX_RECORDS: u32 = 3;

/// Delete every fill-up record outside the newest `max_records` by id.
///
/// Callers run this inside the insert transaction so the cap is never
/// observably exceeded. A cap below one is treated as one: the record just
/// inserted always survives.
pub fn enforce(conn: &Connection, max_records: u32) -> rusqlite::Result<usize> {
    let max_records = max_records.max(1);
    let pruned = conn.execute(
        "DELETE FROM fuel_records WHERE id NOT IN (
            SELECT id FROM fuel_records ORDER BY id DESC LIMIT ?1
        )",
        params![max_records],
    )?;

    debug!(pruned, max_records, "Retention enforced");
    Ok(pruned)
}
