//! # Backup / Restore
//!
//! Whole-store snapshots as one JSON document.
//!
//! ## Snapshot Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  backup()                           restore_json(text)                 │
//! │    │                                  │                                 │
//! │    ▼                                  ▼                                 │
//! │  load all six slots                 parse as JSON object               │
//! │    │                                  │   └── not an object ─► Format  │
//! │    ▼                                  ▼                                 │
//! │  Snapshot + backupDate              BEGIN                              │
//! │    │                                  for each slot key present and    │
//! │    ▼                                  non-null: write raw JSON         │
//! │  backup_json() (pretty)             COMMIT                             │
//! │                                       │                                 │
//! │                                       ▼                                 │
//! │                                     reload every slot ─► Dataset       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Leniency
//! Restore writes each present slot verbatim without checking it against
//! the data model. A slot that later fails to decode loads as its default
//! (with a warning) and is overwritten by the next save.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::{info, warn};

use daftar_core::{Customer, Dataset, Expense, Invoice, Product, SlotKey, Snapshot, Supplier};

use crate::error::{DbError, DbResult};
use crate::repository::collection::CollectionRepository;
use crate::repository::settings::SettingsRepository;
use crate::slot::{self, SlotIssue};

/// Result of a restore.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreOutcome {
    /// Slots that were overwritten, in snapshot field order.
    pub restored: Vec<SlotKey>,
    /// Restored slots whose content did not fully decode.
    pub issues: Vec<SlotIssue>,
    /// Everything reloaded from storage after the restore.
    pub dataset: Dataset,
}

impl RestoreOutcome {
    /// True when every restored slot decoded completely.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Document written by `backup_json`, in snapshot field order.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotDocument {
    settings: Value,
    products: Value,
    invoices: Value,
    expenses: Value,
    customers: Value,
    suppliers: Value,
    backup_date: DateTime<Utc>,
}

/// Backup file name for a business on a given day.
///
/// Each whitespace character in the business name becomes `_`.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use daftar_db::backup::backup_file_name;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// assert_eq!(
///     backup_file_name("My Shop", date),
///     "backup-My_Shop-2024-01-01.json"
/// );
/// ```
pub fn backup_file_name(business_name: &str, date: NaiveDate) -> String {
    let name: String = business_name
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();

    format!("backup-{}-{}.json", name, date.format("%Y-%m-%d"))
}

/// Reads every slot, falling back to defaults.
pub(crate) async fn load_dataset(pool: &SqlitePool) -> DbResult<Dataset> {
    Ok(Dataset {
        settings: SettingsRepository::new(pool.clone()).get().await?,
        products: CollectionRepository::<Product>::new(pool.clone()).list().await?,
        invoices: CollectionRepository::<Invoice>::new(pool.clone()).list().await?,
        expenses: CollectionRepository::<Expense>::new(pool.clone()).list().await?,
        customers: CollectionRepository::<Customer>::new(pool.clone()).list().await?,
        suppliers: CollectionRepository::<Supplier>::new(pool.clone()).list().await?,
    })
}

async fn check_slot(pool: &SqlitePool, key: SlotKey) -> DbResult<Option<SlotIssue>> {
    let pool = pool.clone();
    match key {
        SlotKey::Settings => SettingsRepository::new(pool).check().await,
        SlotKey::Products => CollectionRepository::<Product>::new(pool).check().await,
        SlotKey::Invoices => CollectionRepository::<Invoice>::new(pool).check().await,
        SlotKey::Expenses => CollectionRepository::<Expense>::new(pool).check().await,
        SlotKey::Customers => CollectionRepository::<Customer>::new(pool).check().await,
        SlotKey::Suppliers => CollectionRepository::<Supplier>::new(pool).check().await,
    }
}

fn to_json<T: Serialize>(value: &T) -> DbResult<Value> {
    serde_json::to_value(value).map_err(|e| DbError::Internal(e.to_string()))
}

/// Produces and applies snapshots.
#[derive(Debug, Clone)]
pub struct BackupService {
    pool: SqlitePool,
}

impl BackupService {
    /// Creates a new BackupService.
    pub fn new(pool: SqlitePool) -> Self {
        BackupService { pool }
    }

    /// Snapshot of the current store, stamped now. Writes nothing.
    pub async fn backup(&self) -> DbResult<Snapshot> {
        let dataset = load_dataset(&self.pool).await?;
        let snapshot = Snapshot::new(dataset, Utc::now());

        info!(
            products = snapshot.products.len(),
            invoices = snapshot.invoices.len(),
            expenses = snapshot.expenses.len(),
            customers = snapshot.customers.len(),
            suppliers = snapshot.suppliers.len(),
            "Backup taken"
        );
        Ok(snapshot)
    }

    /// The current snapshot as pretty-printed JSON.
    ///
    /// Collections are written as stored, so records that reads skip are
    /// carried into the file unchanged.
    pub async fn backup_json(&self) -> DbResult<String> {
        let snapshot = self.backup().await?;

        let document = SnapshotDocument {
            settings: to_json(&snapshot.settings)?,
            products: self.stored_list(SlotKey::Products, &snapshot.products).await?,
            invoices: self.stored_list(SlotKey::Invoices, &snapshot.invoices).await?,
            expenses: self.stored_list(SlotKey::Expenses, &snapshot.expenses).await?,
            customers: self.stored_list(SlotKey::Customers, &snapshot.customers).await?,
            suppliers: self.stored_list(SlotKey::Suppliers, &snapshot.suppliers).await?,
            backup_date: snapshot.backup_date,
        };

        serde_json::to_string_pretty(&document).map_err(|e| DbError::Internal(e.to_string()))
    }

    /// The stored array for `key`, or `records` when nothing usable is stored.
    async fn stored_list<T: Serialize>(&self, key: SlotKey, records: &[T]) -> DbResult<Value> {
        if let Some(raw) = slot::read_raw(&self.pool, key).await? {
            if let Ok(value @ Value::Array(_)) = serde_json::from_str::<Value>(&raw) {
                return Ok(value);
            }
        }
        to_json(&records)
    }

    /// Restores from snapshot text.
    ///
    /// ## Errors
    /// - `DbError::Format` when `text` is not a JSON object; storage is untouched
    /// - `DbError::StorageUnavailable` when the write fails; the transaction
    ///   rolls back and storage is untouched
    pub async fn restore_json(&self, text: &str) -> DbResult<RestoreOutcome> {
        let value: Value = serde_json::from_str(text).map_err(|e| {
            warn!(error = %e, "Backup is not valid JSON");
            DbError::format(e.to_string())
        })?;

        self.restore_value(value).await
    }

    /// Restores a typed snapshot. Every slot is overwritten.
    pub async fn restore(&self, snapshot: &Snapshot) -> DbResult<RestoreOutcome> {
        let value = serde_json::to_value(snapshot).map_err(|e| DbError::Internal(e.to_string()))?;
        self.restore_value(value).await
    }

    /// Restores from an already-parsed JSON document.
    ///
    /// Keys other than the six slot names (such as `backupDate`) are
    /// ignored. Slot keys that are missing or `null` leave that slot as it
    /// was.
    pub async fn restore_value(&self, value: Value) -> DbResult<RestoreOutcome> {
        let Value::Object(mut fields) = value else {
            return Err(DbError::format("backup must be a JSON object"));
        };

        let mut writes = Vec::new();
        for key in SlotKey::ALL {
            match fields.remove(key.as_str()) {
                None | Some(Value::Null) => continue,
                Some(raw) => {
                    let text = serde_json::to_string(&raw).map_err(|e| DbError::Encode {
                        key,
                        reason: e.to_string(),
                    })?;
                    writes.push((key, text));
                }
            }
        }

        let mut tx = self.pool.begin().await?;
        for (key, text) in &writes {
            slot::write_raw(&mut *tx, *key, text).await?;
        }
        tx.commit().await?;

        let restored: Vec<SlotKey> = writes.into_iter().map(|(key, _)| key).collect();
        info!(slots = ?restored, "Backup restored");

        let mut issues = Vec::new();
        for key in &restored {
            if let Some(issue) = check_slot(&self.pool, *key).await? {
                warn!(?issue, "Restored slot did not fully decode");
                issues.push(issue);
            }
        }

        let dataset = load_dataset(&self.pool).await?;
        Ok(RestoreOutcome {
            restored,
            issues,
            dataset,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
