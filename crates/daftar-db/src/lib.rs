//! # daftar-db: Storage Layer for Daftar
//!
//! Durable on-device storage for the Daftar bookkeeping store, on SQLite
//! through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Daftar Data Flow                                 │
//! │                                                                         │
//! │  CLI command (report, backup, restore, ...)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     daftar-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │    Backup    │  │   │
//! │  │   │   (pool.rs)   │    │ collection.rs │    │  (backup.rs) │  │   │
//! │  │   │               │    │ product.rs    │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ report.rs ... │    │ Snapshot I/O │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────┬───────┘  │   │
//! │  │                                ▼                   ▼          │   │
//! │  │                    PersistentSlot (slot.rs) ── slots table    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   SQLite: ~/.local/share/daftar/daftar.db (platform data dir)  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and the `Database` handle
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`slot`] - Typed durable slots
//! - [`repository`] - Collection, settings and report repositories
//! - [`backup`] - Snapshot backup and restore
//!
//! ## Usage
//!
//! ```rust,ignore
//! use daftar_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/daftar.db")).await?;
//!
//! db.products().upsert(pen).await?;
//! let statement = db.reports().income_statement().await?;
//! let json = db.backups().backup_json().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backup;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod slot;

// =============================================================================
// Re-exports
// =============================================================================

pub use backup::{backup_file_name, BackupService, RestoreOutcome};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use slot::{JsonCodec, PersistentSlot, SlotCodec, SlotIssue};

// Repository re-exports for convenience
pub use repository::{
    CollectionRepository, CustomerRepository, InvoiceLine, InvoiceRepository, ProductRepository,
    ReportRepository, SettingsRepository, SupplierRepository,
};
