//! Record store repository
//!
//! Provides insert, delete, count and aggregate operations over the records table.

use crate::error::{Error, Result};
use crate::types::{NewRecord, NumericColumn, Record};
use rusqlite::types::FromSql;
use rusqlite::{params, Connection, Row};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use super::schema;

const INSERT_SQL: &str = "INSERT INTO data (name, state, size, length) VALUES (?1, ?2, ?3, ?4)";

/// Handle to the record store.
///
/// Owns a single long-lived connection. Operations assume one caller at a
/// time; the store does not serialize concurrent use.
pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Store {
    /// Open or create a store at the given path and ensure the table exists
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| Error::StorageMedium {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let conn = Connection::open(path)?;
        let store = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        store.initialize()?;

        tracing::debug!(path = %path.display(), "Record store opened");
        Ok(store)
    }

    /// Open an in-memory store (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn, path: None };
        store.initialize()?;
        Ok(store)
    }

    /// Ensure the records table exists
    pub fn initialize(&self) -> Result<()> {
        schema::ensure_schema(&self.conn)?;
        Ok(())
    }

    /// Path of the backing file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Close the connection, reporting any error from the engine
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e)?;
        tracing::debug!("Record store closed");
        Ok(())
    }

    /// Number of stored records
    pub fn count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM data", [], |r| r.get(0))?;
        Ok(count)
    }

    /// Append one record, returning its assigned id
    pub fn insert(&self, record: &NewRecord) -> Result<i64> {
        self.conn.execute(
            INSERT_SQL,
            params![
                record.name,
                record.region,
                record.name_length,
                record.contact_length,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert many records inside one transaction
    ///
    /// Returns the number of rows written.
    pub fn insert_batch(&self, records: &[NewRecord]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(INSERT_SQL)?;
            for record in records {
                stmt.execute(params![
                    record.name,
                    record.region,
                    record.name_length,
                    record.contact_length,
                ])?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    }

    /// Delete every record, returning how many were removed
    pub fn clear_all(&self) -> Result<usize> {
        let removed = self.conn.execute("DELETE FROM data", [])?;
        tracing::info!(removed, "Record store cleared");
        Ok(removed)
    }

    /// Mean of a numeric column, `None` when the store is empty
    pub fn average(&self, column: NumericColumn) -> Result<Option<f64>> {
        let sql = format!("SELECT AVG({}) FROM data", column.as_sql());
        let avg: Option<f64> = self.conn.query_row(&sql, [], |r| r.get(0))?;
        Ok(avg)
    }

    /// Raw values of a numeric column in insertion order, read lazily
    ///
    /// Use `i64` for [`NumericColumn::NameLength`] and `f64` for
    /// [`NumericColumn::ContactLength`].
    pub fn values<T: FromSql>(&self, column: NumericColumn) -> ColumnValues<'_, T> {
        ColumnValues {
            conn: &self.conn,
            column,
            _marker: PhantomData,
        }
    }

    /// Every stored record in insertion order
    pub fn records(&self) -> Result<Vec<Record>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, state, size, length FROM data ORDER BY id")?;
        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Number of records with the given name
    pub fn count_named(&self, name: &str) -> Result<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM data WHERE name = ?1",
            [name],
            |r| r.get(0),
        )?;
        Ok(count)
    }

    fn row_to_record(row: &Row) -> rusqlite::Result<Record> {
        Ok(Record {
            id: row.get("id")?,
            name: row.get::<_, Option<String>>("name")?.unwrap_or_default(),
            region: row.get::<_, Option<String>>("state")?.unwrap_or_default(),
            name_length: row.get::<_, Option<i64>>("size")?.unwrap_or_default(),
            contact_length: row.get::<_, Option<f64>>("length")?.unwrap_or_default(),
        })
    }
}

/// One numeric column of the store.
///
/// Nothing is read until a pass runs. Every pass queries the table again, so
/// the sequence can be walked any number of times and always reflects the
/// current contents.
pub struct ColumnValues<'a, T> {
    conn: &'a Connection,
    column: NumericColumn,
    _marker: PhantomData<fn() -> T>,
}

impl<T: FromSql> ColumnValues<'_, T> {
    /// Stream the values row by row into `f`, returning how many were read
    pub fn try_for_each<F: FnMut(T)>(&self, mut f: F) -> Result<usize> {
        let sql = format!("SELECT {} FROM data ORDER BY id", self.column.as_sql());
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let mut rows = stmt.query([])?;

        let mut read = 0;
        while let Some(row) = rows.next()? {
            f(row.get(0)?);
            read += 1;
        }
        Ok(read)
    }

    /// Read the whole column
    pub fn to_vec(&self) -> Result<Vec<T>> {
        let mut values = Vec::new();
        self.try_for_each(|v| values.push(v))?;
        Ok(values)
    }
}
