//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite, plus the
//! [`Database`] handle that hands out repositories.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  CLI startup / seed binary / tests                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Configure pool settings                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + run migrations            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ├──► db.products()   db.customers()   db.suppliers()             │
//! │       ├──► db.invoices()   db.expenses()    db.settings()              │
//! │       └──► db.reports()    db.backups()                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! File databases run in WAL mode with NORMAL synchronous. A committed
//! slot write survives a process crash.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use daftar_core::{Customer, Dataset, Expense, Invoice, InvoiceStatus, Product, Supplier};

use crate::backup::{self, BackupService};
use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::collection::CollectionRepository;
use crate::repository::invoice::InvoiceLine;
use crate::repository::report::ReportRepository;
use crate::repository::settings::SettingsRepository;

/// Path marker for a private in-memory database.
const IN_MEMORY: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/daftar.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// How long to wait for a free connection.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection. `None` keeps connections
    /// open forever, which in-memory databases need.
    /// Default: 10 minutes
    pub idle_timeout: Option<Duration>,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::new(DbConfig::in_memory()).await?;
    /// // Database is isolated, perfect for tests
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY),
            // Every in-memory connection is its own database: exactly one,
            // and it must never be recycled
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            run_migrations: true,
        }
    }

    /// True when this config points at a private in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(IN_MEMORY)
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&self.database_path)
                // WAL: readers don't block the writer
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true)
        };

        Ok(options)
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Built once at startup and passed by reference to whatever needs storage.
/// Repositories are cheap handles over the shared pool.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./daftar.db")).await?;
///
/// db.products().upsert(pen).await?;
/// let statement = db.reports().income_statement().await?;
/// let json = db.backups().backup_json().await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,
}

impl Database {
    /// Creates a new database connection pool.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures WAL mode and NORMAL synchronous for file databases
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    ///
    /// ## Returns
    /// * `Ok(Database)` - Ready-to-use database handle
    /// * `Err(DbError)` - Connection or migration failed
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_options = config.connect_options()?;
        debug!(in_memory = config.is_in_memory(), "Connection options configured");

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout);

        if config.is_in_memory() {
            pool_options = pool_options.max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Runs database migrations.
    ///
    /// Called by `new()` when `run_migrations` is set; call it manually
    /// otherwise.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the product repository.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let pens = db.products().search("pen").await?;
    /// ```
    pub fn products(&self) -> CollectionRepository<Product> {
        CollectionRepository::new(self.pool.clone())
    }

    /// Returns the customer repository.
    pub fn customers(&self) -> CollectionRepository<Customer> {
        CollectionRepository::new(self.pool.clone())
    }

    /// Returns the supplier repository.
    pub fn suppliers(&self) -> CollectionRepository<Supplier> {
        CollectionRepository::new(self.pool.clone())
    }

    /// Returns the invoice repository.
    pub fn invoices(&self) -> CollectionRepository<Invoice> {
        CollectionRepository::new(self.pool.clone())
    }

    /// Returns the expense repository.
    pub fn expenses(&self) -> CollectionRepository<Expense> {
        CollectionRepository::new(self.pool.clone())
    }

    /// Returns the settings repository.
    pub fn settings(&self) -> SettingsRepository {
        SettingsRepository::new(self.pool.clone())
    }

    /// Returns the report repository.
    pub fn reports(&self) -> ReportRepository {
        ReportRepository::new(self.pool.clone())
    }

    /// Returns the backup/restore service.
    pub fn backups(&self) -> BackupService {
        BackupService::new(self.pool.clone())
    }

    /// Reloads every slot from durable storage.
    ///
    /// Slots that are missing or fail to decode come back as defaults.
    pub async fn load_dataset(&self) -> DbResult<Dataset> {
        backup::load_dataset(&self.pool).await
    }

    /// Builds an invoice from stored records and saves it.
    ///
    /// Resolves `customer_id` and every line's product id against the
    /// current collections and applies the current tax settings. Any id
    /// that does not resolve fails with `ValidationError::Unresolved` and
    /// nothing is written.
    pub async fn create_invoice(
        &self,
        customer_id: &str,
        lines: &[InvoiceLine],
        status: InvoiceStatus,
    ) -> DbResult<Invoice> {
        let customers = self.customers().list().await?;
        let products = self.products().list().await?;
        let settings = self.settings().get().await?;

        self.invoices()
            .create(&customers, &products, &settings, customer_id, lines, status)
            .await
    }

    /// Closes the database connection pool.
    ///
    /// After calling close, every repository operation fails with
    /// `StorageUnavailable`.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use daftar_core::{Money, ValidationError};

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }

    #[tokio::test]
    async fn test_file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daftar.db");

        {
            let db = Database::new(DbConfig::new(&path)).await.unwrap();
            let mut pen = Product::new("Pen", "P1", Money::from_major(2));
            pen.quantity = 10;
            db.products().upsert(pen).await.unwrap();
            db.close().await;
        }

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        let products = db.products().list().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].quantity, 10);
    }

    #[tokio::test]
    async fn test_closed_pool_is_storage_unavailable() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        let err = db.products().list().await.unwrap_err();
        assert!(matches!(err, DbError::StorageUnavailable(_)));

        let err = db
            .products()
            .upsert(Product::new("Pen", "P1", Money::from_major(2)))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::StorageUnavailable(_)));
        assert!(!db.health_check().await);
    }

    #[tokio::test]
    async fn test_create_invoice_resolves_references() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let acme = db.customers().upsert(Customer::new("Acme")).await.unwrap();
        let pen = db
            .products()
            .upsert(Product::new("Pen", "P1", Money::from_major(2)))
            .await
            .unwrap();

        let invoice = db
            .create_invoice(
                &acme.id,
                &[InvoiceLine::new(&pen.id, 50)],
                InvoiceStatus::Paid,
            )
            .await
            .unwrap();

        // Default settings: 15% tax enabled
        assert_eq!(invoice.subtotal, Money::from_major(100));
        assert_eq!(invoice.tax, Money::from_major(15));
        assert_eq!(invoice.total, Money::from_major(115));
        assert_eq!(invoice.customer_name, "Acme");
        assert_eq!(db.invoices().len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_invoice_rejects_unknown_customer() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db
            .create_invoice("missing", &[], InvoiceStatus::Draft)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Validation(ValidationError::Unresolved { .. })
        ));
        assert_eq!(db.invoices().len().await.unwrap(), 0);
    }
}
