//! Error type shared by the store, the inventory service and the report
//! generator. Every variant is local to one user action: the action aborts,
//! the database is left as it was, and the TUI shows the message.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryError {
    /// Insert with an id that already exists.
    #[error("Equipment ID '{0}' already exists.")]
    DuplicateKey(String),

    /// The operation targets a record that is not selected or no longer exists.
    #[error("{0}")]
    NotFound(String),

    /// Missing holder identifier or blank required form fields.
    #[error("{0}")]
    Validation(String),

    /// A report was requested while the table is empty.
    #[error("No records available for report.")]
    NoData,

    #[error("database error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl InventoryError {
    pub fn not_found(what: impl Into<String>) -> Self {
        InventoryError::NotFound(what.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        InventoryError::Validation(message.into())
    }
}

pub type InventoryResult<T> = Result<T, InventoryError>;
