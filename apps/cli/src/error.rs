//! # CLI Error Type
//!
//! Everything a command can fail with, and the exit code it maps to.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ValidationError ──► DbError ──┐                                        │
//! │  std::io::Error  ──────────────┼──► CliError ──► stderr + exit code    │
//! │  bad DAFTAR_* variable ────────┤                                        │
//! │  restore without --yes ────────┘                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use thiserror::Error;

use daftar_db::DbError;

/// Command failure.
#[derive(Debug, Error)]
pub enum CliError {
    /// Storage or validation failure from the store.
    #[error(transparent)]
    Db(#[from] DbError),

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bad environment or missing platform directories.
    #[error("Configuration error: {0}")]
    Config(String),

    /// `--json` output could not be produced.
    #[error("Could not render output: {0}")]
    Render(#[from] serde_json::Error),

    /// A destructive command ran without `--yes`.
    #[error("{0} replaces stored data; re-run with --yes to confirm")]
    ConfirmationRequired(&'static str),
}

impl CliError {
    /// Creates an Io error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CliError::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code (sysexits-style).
    ///
    /// ```text
    /// bad input (validation / snapshot format) → 65
    /// I/O                                      → 74
    /// configuration                            → 78
    /// missing --yes                            →  2
    /// anything else                            →  1
    /// ```
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Db(err) if err.is_rejected_input() => 65,
            CliError::Db(_) | CliError::Render(_) => 1,
            CliError::Io { .. } => 74,
            CliError::Config(_) => 78,
            CliError::ConfirmationRequired(_) => 2,
        }
    }
}

/// Result type for commands.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::from(DbError::format("nope")).exit_code(), 65);
        assert_eq!(
            CliError::from(DbError::StorageUnavailable("locked".into())).exit_code(),
            1
        );
        assert_eq!(CliError::ConfirmationRequired("restore").exit_code(), 2);
        assert_eq!(CliError::Config("bad".into()).exit_code(), 78);
    }

    #[test]
    fn test_confirmation_message() {
        let err = CliError::ConfirmationRequired("restore");
        assert_eq!(
            err.to_string(),
            "restore replaces stored data; re-run with --yes to confirm"
        );
    }
}
