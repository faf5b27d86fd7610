//! Table definition for the record store
//!
//! The store holds a single table. It is created on open when missing and is
//! never migrated.

use rusqlite::Connection;

/// `STRICT` makes SQLite reject values that cannot be stored losslessly in the
/// declared column type, so text never lands in `size` or `length`.
const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS data (
        id      INTEGER PRIMARY KEY AUTOINCREMENT,
        name    TEXT,
        state   TEXT,
        size    INTEGER,
        length  REAL
    ) STRICT;
"#;

/// Ensure the records table exists. Safe to call repeatedly.
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CREATE_TABLE)
}

/// Whether the records table is present
#[cfg(test)]
fn table_exists(conn: &Connection) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='data'",
        [],
        |r| r.get(0),
    )?;
    Ok(count == 1)
}
