//! # Collection Repository
//!
//! Generic list/upsert/remove over one slot holding a JSON array of `E`.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  upsert(e)                                                              │
//! │    │                                                                    │
//! │    ├─► e.validate()            ── Err ─► ValidationError, no write     │
//! │    ├─► load stored array       ── not an array ─► Unreadable, no write │
//! │    ├─► decode record by record (unreadable ones are carried verbatim)  │
//! │    ├─► unique key clash?       ── yes ─► Duplicate, no write           │
//! │    ├─► same id present? replace in place : append                       │
//! │    └─► save whole array        (one statement)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A record that does not decode (say a restored product with
//! `"quantity": 2.5`) is skipped by reads with a warning, but it stays in
//! the stored array through every later write. Upserting a record with
//! the same id replaces it; removing that id drops it.
//!
//! Read-modify-write is not locked. Two writers on the same collection
//! race and the last save wins.

use serde::Deserialize;
use serde_json::Value;
use sqlx::SqlitePool;
use std::marker::PhantomData;
use tracing::{debug, warn};

use daftar_core::{Entity, ValidationError};

use crate::error::{DbError, DbResult};
use crate::slot::{PersistentSlot, SlotIssue};

/// One element of a stored collection.
enum Entry<E> {
    Record(E),
    Unreadable(Value),
}

impl<E: Entity> Entry<E> {
    fn id(&self) -> Option<&str> {
        match self {
            Entry::Record(record) => Some(record.id()),
            Entry::Unreadable(value) => value.get("id").and_then(Value::as_str),
        }
    }

    fn into_value(self) -> DbResult<Value> {
        match self {
            Entry::Record(record) => serde_json::to_value(&record).map_err(|e| DbError::Encode {
                key: E::COLLECTION,
                reason: e.to_string(),
            }),
            Entry::Unreadable(value) => Ok(value),
        }
    }
}

fn decode<E: Entity>(values: Vec<Value>) -> Vec<Entry<E>> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| match E::deserialize(&value) {
            Ok(record) => Entry::Record(record),
            Err(e) => {
                warn!(entity = E::NAME, index, error = %e, "Skipping unreadable record");
                Entry::Unreadable(value)
            }
        })
        .collect()
}

fn records<E: Entity>(entries: Vec<Entry<E>>) -> Vec<E> {
    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Entry::Record(record) => Some(record),
            Entry::Unreadable(_) => None,
        })
        .collect()
}

/// Repository over one typed collection.
///
/// Obtained from the `Database` accessors (`db.products()`,
/// `db.invoices()`, ...). Entity-specific queries live in sibling modules.
#[derive(Debug, Clone)]
pub struct CollectionRepository<E: Entity> {
    slot: PersistentSlot<Vec<Value>>,
    entity: PhantomData<E>,
}

impl<E: Entity> CollectionRepository<E> {
    /// Creates a repository over `E`'s slot.
    pub fn new(pool: SqlitePool) -> Self {
        CollectionRepository {
            slot: PersistentSlot::new(pool, E::COLLECTION, Vec::new()),
            entity: PhantomData,
        }
    }

    /// The full collection in storage order.
    ///
    /// Records that do not decode are left out.
    pub async fn list(&self) -> DbResult<Vec<E>> {
        let values = self.slot.load().await?;
        Ok(records(decode(values)))
    }

    /// Looks up a record by id.
    pub async fn get(&self, id: &str) -> DbResult<Option<E>> {
        let items = self.list().await?;
        Ok(items.into_iter().find(|e| e.id() == id))
    }

    /// Number of readable records.
    pub async fn len(&self) -> DbResult<usize> {
        Ok(self.list().await?.len())
    }

    /// True when the collection has no readable records.
    pub async fn is_empty(&self) -> DbResult<bool> {
        Ok(self.len().await? == 0)
    }

    /// Describes stored content that reads leave out, if any.
    pub async fn check(&self) -> DbResult<Option<SlotIssue>> {
        let values = match self.slot.try_load().await {
            Ok(values) => values,
            Err(DbError::Unreadable { key, reason }) => {
                return Ok(Some(SlotIssue::Unreadable { key, reason }))
            }
            Err(err) => return Err(err),
        };

        let count = values
            .iter()
            .filter(|value| E::deserialize(*value).is_err())
            .count();

        Ok((count > 0).then_some(SlotIssue::SkippedRecords {
            key: E::COLLECTION,
            count,
        }))
    }

    /// Creates or replaces a record.
    ///
    /// A record whose id is already present replaces it at the same
    /// position; otherwise it is appended. Returns the stored record.
    ///
    /// ## Errors
    /// - `DbError::Validation` when the record is invalid or its unique
    ///   key (e.g. product SKU) belongs to another record
    /// - `DbError::Unreadable` when the stored collection is not a list;
    ///   it is left as it is
    /// - `DbError::StorageUnavailable` when the save fails
    pub async fn upsert(&self, entity: E) -> DbResult<E> {
        entity.validate()?;

        let mut entries = decode::<E>(self.slot.try_load().await?);

        if let Some((field, value)) = entity.unique_key() {
            let clash = entries.iter().any(|entry| match entry {
                Entry::Record(other) => {
                    other.id() != entity.id() && other.unique_key().map(|(_, v)| v) == Some(value)
                }
                Entry::Unreadable(_) => false,
            });
            if clash {
                return Err(ValidationError::Duplicate {
                    field: field.to_string(),
                    value: value.to_string(),
                }
                .into());
            }
        }

        let replaced = match entries.iter_mut().find(|e| e.id() == Some(entity.id())) {
            Some(existing) => {
                *existing = Entry::Record(entity.clone());
                true
            }
            None => {
                entries.push(Entry::Record(entity.clone()));
                false
            }
        };

        let count = entries.len();
        self.save(entries).await?;

        debug!(
            entity = E::NAME,
            id = %entity.id(),
            replaced,
            count,
            "Record upserted"
        );
        Ok(entity)
    }

    /// Deletes the record with `id`.
    ///
    /// Returns `false` (and writes nothing) when no such record exists.
    /// Records elsewhere that point at `id` are left alone.
    pub async fn remove(&self, id: &str) -> DbResult<bool> {
        let mut entries = decode::<E>(self.slot.try_load().await?);
        let before = entries.len();
        entries.retain(|e| e.id() != Some(id));

        if entries.len() == before {
            debug!(entity = E::NAME, id = %id, "Nothing to remove");
            return Ok(false);
        }

        self.save(entries).await?;
        debug!(entity = E::NAME, id = %id, "Record removed");
        Ok(true)
    }

    async fn save(&self, entries: Vec<Entry<E>>) -> DbResult<()> {
        let values = entries
            .into_iter()
            .map(Entry::into_value)
            .collect::<DbResult<Vec<Value>>>()?;
        self.slot.save(&values).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
