//! # Configuration
//!
//! Settings the CLI reads from its environment at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (`--db`, `--out`, `--limit`)
//! 2. Environment variables (`DAFTAR_*`)
//! 3. Defaults (this file)
//!
//! Business settings (name, currency, tax) are not configuration; they live
//! in the store and are edited through it.

use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use daftar_core::reports::DEFAULT_ACTIVITY_LIMIT;

use crate::error::{CliError, CliResult};

/// Database file override.
pub const ENV_DB_PATH: &str = "DAFTAR_DB_PATH";
/// Default directory for `backup` output.
pub const ENV_BACKUP_DIR: &str = "DAFTAR_BACKUP_DIR";
/// Default size of the activity feed.
pub const ENV_ACTIVITY_LIMIT: &str = "DAFTAR_ACTIVITY_LIMIT";

/// Database file name inside the data directory.
const DB_FILE_NAME: &str = "daftar.db";

/// Resolved CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite database file.
    pub database_path: PathBuf,

    /// Where `backup` writes when `--out` is not given.
    /// Default: current directory
    pub backup_dir: PathBuf,

    /// Entries shown by `activity` when `--limit` is not given.
    /// Default: 5
    pub activity_limit: usize,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// ## Environment Variables
    /// - `DAFTAR_DB_PATH`: database file (default: platform data directory)
    /// - `DAFTAR_BACKUP_DIR`: backup output directory
    /// - `DAFTAR_ACTIVITY_LIMIT`: default activity feed size
    pub fn from_env() -> CliResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from any key lookup (the environment in
    /// production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CliResult<Self> {
        let set = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_path = match set(ENV_DB_PATH) {
            Some(path) => PathBuf::from(path),
            None => default_database_path()?,
        };

        let backup_dir = set(ENV_BACKUP_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let activity_limit = match set(ENV_ACTIVITY_LIMIT) {
            Some(raw) => parse_limit(&raw)?,
            None => DEFAULT_ACTIVITY_LIMIT,
        };

        Ok(AppConfig {
            database_path,
            backup_dir,
            activity_limit,
        })
    }

    /// Replaces the database path (the `--db` flag).
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }
}

fn parse_limit(raw: &str) -> CliResult<usize> {
    match raw.trim().parse::<usize>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(CliError::Config(format!(
            "{} must be a positive whole number, got '{}'",
            ENV_ACTIVITY_LIMIT, raw
        ))),
    }
}

/// Platform data directory path for the database.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.daftar.daftar/daftar.db`
/// - **Windows**: `%APPDATA%\daftar\daftar\data\daftar.db`
/// - **Linux**: `~/.local/share/daftar/daftar.db`
pub fn default_database_path() -> CliResult<PathBuf> {
    let dirs = ProjectDirs::from("com", "daftar", "daftar")
        .ok_or_else(|| CliError::Config("could not determine app data directory".to_string()))?;

    Ok(dirs.data_dir().join(DB_FILE_NAME))
}

/// Creates the parent directory of `path` if it is missing.
pub fn ensure_parent_dir(path: &Path) -> CliResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| CliError::io(parent, e))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, "/tmp/shop.db"),
            (ENV_BACKUP_DIR, "/tmp/backups"),
            (ENV_ACTIVITY_LIMIT, "12"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/shop.db"));
        assert_eq!(config.backup_dir, PathBuf::from("/tmp/backups"));
        assert_eq!(config.activity_limit, 12);
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[(ENV_DB_PATH, "shop.db")])).unwrap();

        assert_eq!(config.backup_dir, PathBuf::from("."));
        assert_eq!(config.activity_limit, DEFAULT_ACTIVITY_LIMIT);
    }

    #[test]
    fn test_bad_limit() {
        for bad in ["zero", "0", "-3"] {
            let err = AppConfig::from_lookup(lookup(&[
                (ENV_DB_PATH, "shop.db"),
                (ENV_ACTIVITY_LIMIT, bad),
            ]))
            .unwrap_err();
            assert!(matches!(err, CliError::Config(_)), "accepted {}", bad);
        }
    }

    #[test]
    fn test_flag_overrides_env() {
        let config = AppConfig::from_lookup(lookup(&[(ENV_DB_PATH, "env.db")]))
            .unwrap()
            .with_database_path("flag.db");
        assert_eq!(config.database_path, PathBuf::from("flag.db"));
    }

    #[test]
    fn test_ensure_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("daftar.db");

        ensure_parent_dir(&path).unwrap();
        assert!(dir.path().join("nested").is_dir());

        // Bare file name: nothing to create
        ensure_parent_dir(Path::new("daftar.db")).unwrap();
    }
}
