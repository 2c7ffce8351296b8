//! # Settings Repository
//!
//! The business settings singleton. Missing or unreadable settings load as
//! [`AppSettings::default`]. `set` replaces the whole object, so it is
//! allowed over unreadable settings.

use sqlx::SqlitePool;
use tracing::info;

use daftar_core::validation::validate_settings;
use daftar_core::{AppSettings, SlotKey};

use crate::error::{DbError, DbResult};
use crate::slot::{PersistentSlot, SlotIssue};

/// Repository for the settings slot.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    slot: PersistentSlot<AppSettings>,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository {
            slot: PersistentSlot::new(pool, SlotKey::Settings, AppSettings::default()),
        }
    }

    /// Current settings.
    pub async fn get(&self) -> DbResult<AppSettings> {
        self.slot.load().await
    }

    /// Replaces the settings after validating them.
    pub async fn set(&self, settings: AppSettings) -> DbResult<AppSettings> {
        validate_settings(&settings)?;
        self.slot.save(&settings).await?;

        info!(
            business = %settings.business_name,
            tax_bps = settings.tax_rate.bps(),
            tax_enabled = settings.is_tax_enabled,
            "Settings saved"
        );
        Ok(settings)
    }

    /// True once settings have been saved (or restored) at least once.
    pub async fn is_configured(&self) -> DbResult<bool> {
        self.slot.exists().await
    }

    /// Describes stored settings that do not decode, if any.
    pub async fn check(&self) -> DbResult<Option<SlotIssue>> {
        match self.slot.try_load().await {
            Ok(_) => Ok(None),
            Err(DbError::Unreadable { key, reason }) => {
                Ok(Some(SlotIssue::Unreadable { key, reason }))
            }
            Err(err) => Err(err),
        }
    }
}
