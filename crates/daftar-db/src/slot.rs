//! # Persistent Slots
//!
//! A slot is a named, durable home for one value: a whole collection or the
//! settings object. Every write replaces the stored value wholesale.
//!
//! ## Load / Save
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  load()                               save(value)                      │
//! │    │                                    │                               │
//! │    ▼                                    ▼                               │
//! │  SELECT value FROM slots            C::encode(value)                   │
//! │    │                                    │                               │
//! │    ├── no row ──────► default           ▼                               │
//! │    │                                INSERT ... ON CONFLICT(key)        │
//! │    ▼                                DO UPDATE  (one statement)         │
//! │  C::decode(raw)                                                         │
//! │    │                                                                    │
//! │    ├── Err ─► load():     warn! + default  (stored value left as is)   │
//! │    │          try_load(): DbError::Unreadable                           │
//! │    └── Ok  ─► value                                                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A storage failure on either path is `DbError::StorageUnavailable`. Only
//! `load` swallows a *decode* failure; writers that merge into the stored
//! value use `try_load` so they never replace text they could not read.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{Executor, Sqlite, SqlitePool};
use std::marker::PhantomData;
use tracing::{debug, warn};

use daftar_core::SlotKey;

use crate::error::{DbError, DbResult};

// =============================================================================
// Codec
// =============================================================================

/// Converts slot values to and from their stored text.
pub trait SlotCodec<T> {
    fn encode(value: &T) -> Result<String, String>;
    fn decode(raw: &str) -> Result<T, String>;
}

/// Stores values as compact JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl<T> SlotCodec<T> for JsonCodec
where
    T: Serialize + DeserializeOwned,
{
    fn encode(value: &T) -> Result<String, String> {
        serde_json::to_string(value).map_err(|e| e.to_string())
    }

    fn decode(raw: &str) -> Result<T, String> {
        serde_json::from_str(raw).map_err(|e| e.to_string())
    }
}

// =============================================================================
// Slot Issues
// =============================================================================

/// Stored content that could not be fully read back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotIssue {
    /// The slot's text does not decode at all. It loads as its default and
    /// collection writes are refused until it is replaced.
    Unreadable { key: SlotKey, reason: String },

    /// Some records in a collection do not decode. They stay in storage
    /// untouched but are left out of reads.
    SkippedRecords { key: SlotKey, count: usize },
}

impl SlotIssue {
    /// The slot the issue belongs to.
    pub fn key(&self) -> SlotKey {
        match self {
            SlotIssue::Unreadable { key, .. } | SlotIssue::SkippedRecords { key, .. } => *key,
        }
    }
}

// =============================================================================
// Raw Access
// =============================================================================

/// Reads the stored text for `key`, if any.
pub(crate) async fn read_raw<'e, E>(executor: E, key: SlotKey) -> DbResult<Option<String>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let raw: Option<String> = sqlx::query_scalar("SELECT value FROM slots WHERE key = ?1")
        .bind(key.as_str())
        .fetch_optional(executor)
        .await?;

    Ok(raw)
}

/// Replaces the stored text for `key` in a single statement.
pub(crate) async fn write_raw<'e, E>(executor: E, key: SlotKey, raw: &str) -> DbResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO slots (key, value, updated_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(key.as_str())
    .bind(raw)
    .bind(Utc::now().to_rfc3339())
    .execute(executor)
    .await?;

    Ok(())
}

// =============================================================================
// Persistent Slot
// =============================================================================

/// A typed value bound to a durable slot, with a fallback default.
///
/// ## Example
/// ```rust,ignore
/// let slot: PersistentSlot<Vec<Product>> =
///     PersistentSlot::new(pool, SlotKey::Products, Vec::new());
///
/// slot.save(&products).await?;
/// assert_eq!(slot.load().await?, products);
/// ```
#[derive(Debug, Clone)]
pub struct PersistentSlot<T, C = JsonCodec> {
    pool: SqlitePool,
    key: SlotKey,
    default: T,
    codec: PhantomData<C>,
}

impl<T, C> PersistentSlot<T, C>
where
    T: Clone,
    C: SlotCodec<T>,
{
    /// Binds `key` to `default` over the given pool.
    pub fn new(pool: SqlitePool, key: SlotKey, default: T) -> Self {
        PersistentSlot {
            pool,
            key,
            default,
            codec: PhantomData,
        }
    }

    /// The slot's storage key.
    pub fn key(&self) -> SlotKey {
        self.key
    }

    /// Loads the stored value.
    ///
    /// Returns the default when nothing is stored or the stored text does
    /// not decode. Nothing is written in either case.
    pub async fn load(&self) -> DbResult<T> {
        match self.try_load().await {
            Err(DbError::Unreadable { reason, .. }) => {
                warn!(key = %self.key, %reason, "Stored value unreadable, using default");
                Ok(self.default.clone())
            }
            other => other,
        }
    }

    /// Loads the stored value, failing when the stored text does not decode.
    ///
    /// Returns the default when nothing is stored.
    ///
    /// ## Errors
    /// - `DbError::Unreadable` when stored text exists but does not decode
    pub async fn try_load(&self) -> DbResult<T> {
        let Some(raw) = read_raw(&self.pool, self.key).await? else {
            debug!(key = %self.key, "Slot empty, using default");
            return Ok(self.default.clone());
        };

        C::decode(&raw).map_err(|reason| DbError::Unreadable {
            key: self.key,
            reason,
        })
    }

    /// Replaces the stored value.
    pub async fn save(&self, value: &T) -> DbResult<()> {
        let raw = C::encode(value).map_err(|reason| DbError::Encode {
            key: self.key,
            reason,
        })?;

        write_raw(&self.pool, self.key, &raw).await?;
        debug!(key = %self.key, bytes = raw.len(), "Slot saved");
        Ok(())
    }

    /// True when durable content is stored under this key.
    pub async fn exists(&self) -> DbResult<bool> {
        Ok(read_raw(&self.pool, self.key).await?.is_some())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use daftar_core::{AppSettings, Money, Product};

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn products_slot(db: &Database) -> PersistentSlot<Vec<Product>> {
        PersistentSlot::new(db.pool().clone(), SlotKey::Products, Vec::new())
    }

    #[tokio::test]
    async fn test_missing_slot_loads_default() {
        let db = setup().await;
        let slot = products_slot(&db);

        assert!(slot.load().await.unwrap().is_empty());
        assert!(!slot.exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_round_trip_empty_one_and_many() {
        let db = setup().await;
        let slot = products_slot(&db);

        slot.save(&Vec::new()).await.unwrap();
        assert!(slot.exists().await.unwrap());
        assert!(slot.load().await.unwrap().is_empty());

        let one = vec![Product::new("Pen", "P1", Money::from_major(2))];
        slot.save(&one).await.unwrap();
        assert_eq!(slot.load().await.unwrap(), one);

        let many: Vec<Product> = (0..25)
            .map(|i| Product::new(format!("Item {}", i), format!("SKU-{}", i), Money::from_cents(150 + i)))
            .collect();
        slot.save(&many).await.unwrap();
        assert_eq!(slot.load().await.unwrap(), many);
    }

    #[tokio::test]
    async fn test_settings_round_trip() {
        let db = setup().await;
        let slot: PersistentSlot<AppSettings> =
            PersistentSlot::new(db.pool().clone(), SlotKey::Settings, AppSettings::default());

        let mut settings = AppSettings::default();
        settings.business_name = "Corner Shop".to_string();
        settings.is_tax_enabled = false;

        slot.save(&settings).await.unwrap();
        assert_eq!(slot.load().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn test_malformed_value_loads_default_without_writing() {
        let db = setup().await;
        write_raw(db.pool(), SlotKey::Products, "{not json").await.unwrap();

        let slot = products_slot(&db);
        assert!(slot.load().await.unwrap().is_empty());

        // The unreadable text is still there
        let raw = read_raw(db.pool(), SlotKey::Products).await.unwrap();
        assert_eq!(raw.as_deref(), Some("{not json"));
    }

    #[tokio::test]
    async fn test_try_load_reports_unreadable_value() {
        let db = setup().await;
        let slot = products_slot(&db);

        assert!(slot.try_load().await.unwrap().is_empty());

        write_raw(db.pool(), SlotKey::Products, "\"garbage\"").await.unwrap();
        let err = slot.try_load().await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Unreadable { key: SlotKey::Products, .. }
        ));
    }
}
