//! # Database Error Types
//!
//! Error types for storage operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ValidationError (daftar-core)   sqlx::Error   serde_json::Error       │
//! │       │                               │               │                 │
//! │       ▼                               ▼               ▼                 │
//! │  DbError (this module) ← Validation / StorageUnavailable / Format      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CliError (in app) ← Printed for the operator                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant is returned to the immediate caller. Nothing is retried
//! and nothing is reported on a side channel.

use daftar_core::{SlotKey, ValidationError};
use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// A record failed validation; nothing was written.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A snapshot could not be parsed; nothing was written.
    ///
    /// ## When This Occurs
    /// - Backup file is not JSON
    /// - Backup file is JSON but not an object
    #[error("Invalid snapshot: {0}")]
    Format(String),

    /// Durable storage cannot be used right now.
    ///
    /// ## When This Occurs
    /// - Pool closed or timed out
    /// - Disk full, read-only file, database locked
    /// - I/O failure
    ///
    /// Prior durable state is whatever it was before the failed call.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Stored text in a slot does not decode, so it cannot be merged into.
    ///
    /// ## When This Occurs
    /// - A restored snapshot put something other than a list in a
    ///   collection slot, and a write then tried to update that collection
    #[error("Stored {key} cannot be read: {reason}")]
    Unreadable { key: SlotKey, reason: String },

    /// A value could not be encoded for its slot.
    #[error("Could not encode {key}: {reason}")]
    Encode { key: SlotKey, reason: String },

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a Format error.
    pub fn format(reason: impl Into<String>) -> Self {
        DbError::Format(reason.into())
    }

    /// True for errors that leave storage untouched because input was rejected.
    pub fn is_rejected_input(&self) -> bool {
        matches!(self, DbError::Validation(_) | DbError::Format(_))
    }
}

/// SQLite messages that mean "the store cannot take writes/reads now".
const UNAVAILABLE_MARKERS: &[&str] = &[
    "database or disk is full",
    "attempt to write a readonly database",
    "database is locked",
    "disk I/O error",
    "unable to open database file",
];

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::PoolTimedOut / PoolClosed / Io   → StorageUnavailable
/// sqlx::Error::Database (full, readonly, locked) → StorageUnavailable
/// sqlx::Error::Database (other)                  → QueryFailed
/// Other                                          → Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => {
                DbError::StorageUnavailable("connection pool timed out".to_string())
            }

            sqlx::Error::PoolClosed => DbError::StorageUnavailable("pool is closed".to_string()),

            sqlx::Error::Io(io) => DbError::StorageUnavailable(io.to_string()),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                if UNAVAILABLE_MARKERS.iter().any(|marker| msg.contains(marker)) {
                    DbError::StorageUnavailable(msg.to_string())
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_are_storage_unavailable() {
        let err: DbError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, DbError::StorageUnavailable(_)));

        let err: DbError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, DbError::StorageUnavailable(_)));
    }

    #[test]
    fn test_validation_converts() {
        let err: DbError = ValidationError::required("name").into();
        assert!(err.is_rejected_input());
        assert_eq!(err.to_string(), "Validation error: name is required");
    }
}
