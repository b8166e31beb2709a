use std::fs;
use std::path::Path;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::InventoryResult;
use crate::models::Status;

/// Owned handle to the SQLite database. It is opened once at startup, handed
/// to the inventory service, and closed when dropped at exit.
pub struct EquipmentStore {
    pub(super) conn: Connection,
}

impl EquipmentStore {
    /// Open (creating if needed) the database file and make sure the schema
    /// exists.
    pub fn open(path: impl AsRef<Path>) -> InventoryResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        info!(path = %path.display(), "opening equipment database");
        let store = Self {
            conn: Connection::open(path)?,
        };
        store.initialize()?;
        Ok(store)
    }

    /// Private database for tests and throwaway sessions.
    pub fn open_in_memory() -> InventoryResult<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.initialize()?;
        Ok(store)
    }

    /// Create the `equipment` table if it is missing. Safe to run on every
    /// startup.
    pub fn initialize(&self) -> InventoryResult<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS equipment (
                name TEXT NOT NULL,
                id TEXT PRIMARY KEY NOT NULL,
                category TEXT NOT NULL,
                status TEXT NOT NULL CHECK (status IN ('Available', 'In Use')),
                holder TEXT NOT NULL
            )",
            [],
        )?;
        debug!("equipment schema ready");
        Ok(())
    }

    /// Run `f` inside one SQLite transaction. `Ok` commits; an error drops the
    /// transaction, which rolls it back before the error is returned.
    pub fn transaction<T, F>(&self, f: F) -> InventoryResult<T>
    where
        F: FnOnce(&Self) -> InventoryResult<T>,
    {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }
}

impl ToSql for Status {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Status {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|err| FromSqlError::Other(Box::new(err)))
    }
}
