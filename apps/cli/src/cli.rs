//! Command-line surface of the `daftar` binary.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Small-business bookkeeping from the terminal.
#[derive(Debug, Parser)]
#[command(name = "daftar", version, about)]
pub struct Cli {
    /// Database file (overrides DAFTAR_DB_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Income statement plus sales and expenses for one day
    Report {
        /// Day to report on, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Most recent invoices and expenses, newest first
    Activity {
        /// Number of entries (default: DAFTAR_ACTIVITY_LIMIT or 5)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List products, optionally filtered by name or SKU
    Products {
        #[arg(long)]
        search: Option<String>,
    },

    /// Products at or below their reorder point
    LowStock,

    /// Write a snapshot of the whole store to a JSON file
    Backup {
        /// Output directory (default: DAFTAR_BACKUP_DIR or current directory)
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// Replace stored data with a snapshot file
    Restore {
        /// Snapshot file produced by `backup`
        file: PathBuf,

        /// Confirm that stored data will be overwritten
        #[arg(long)]
        yes: bool,
    },

    /// Show business settings
    Settings {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}
