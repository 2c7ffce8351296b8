//! # Daftar CLI Entry Point
//!
//! The `daftar` binary: a terminal front end over the bookkeeping store.
//!
//! ## Module Organization
//! ```text
//! daftar/
//! ├── main.rs       ◄─── You are here (startup & dispatch)
//! ├── cli.rs        ◄─── clap argument definitions
//! ├── config.rs     ◄─── DAFTAR_* environment configuration
//! ├── commands.rs   ◄─── One function per subcommand
//! └── error.rs      ◄─── CliError and exit codes
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize Logging ─── tracing-subscriber on stderr, RUST_LOG       │
//! │  2. Parse Arguments ────── clap                                         │
//! │  3. Resolve Config ─────── DAFTAR_* env, then --db                      │
//! │  4. Connect to Database ── SQLite (WAL), pending migrations             │
//! │  5. Dispatch Command ───── print result to stdout                       │
//! │  6. Close Pool ─────────── exit 0, or the error's exit code             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cli;
mod commands;
mod config;
mod error;

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use daftar_db::{Database, DbConfig};

use cli::{Cli, Command};
use config::AppConfig;
use error::CliResult;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "Command failed");
            eprintln!("error: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so command output on stdout stays pipeable.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=daftar_db=trace` - Trace the storage layer only
/// - Default: INFO, with debug for daftar crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,daftar=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> CliResult<String> {
    let mut config = AppConfig::from_env()?;
    if let Some(path) = cli.db {
        config = config.with_database_path(path);
    }

    config::ensure_parent_dir(&config.database_path)?;
    info!(path = %config.database_path.display(), "Opening store");

    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    let result = dispatch(&db, &config, cli.command).await;
    db.close().await;
    result
}

async fn dispatch(db: &Database, config: &AppConfig, command: Command) -> CliResult<String> {
    match command {
        Command::Report { date, json } => commands::report(db, date, json).await,
        Command::Activity { limit } => {
            commands::activity(db, limit.unwrap_or(config.activity_limit)).await
        }
        Command::Products { search } => commands::products(db, search.as_deref()).await,
        Command::LowStock => commands::low_stock(db).await,
        Command::Backup { out } => {
            let dir = out.unwrap_or_else(|| config.backup_dir.clone());
            let path = commands::backup(db, &dir).await?;
            Ok(format!("Backup written to {}", path.display()))
        }
        Command::Restore { file, yes } => commands::restore(db, &file, yes).await,
        Command::Settings { json } => commands::settings(db, json).await,
    }
}
