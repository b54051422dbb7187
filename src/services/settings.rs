//! Settings service
//!
//! Reads the fiscal settings, rewrites the quarter boundaries, and runs the
//! first-time initialization.

use chrono::{Datelike, Local};
use tracing::{info, warn};

use crate::audit::{AuditEntry, EntityType};
use crate::error::QuarterbookResult;
use crate::models::settings::SETTINGS_ID;
use crate::models::{QuarterBoundaries, Settings, Transaction};
use crate::storage::{initialize_storage, Storage};

/// What an `update_quarters` call changed
#[derive(Debug, Clone)]
pub struct SettingsUpdate {
    pub settings: Settings,
    /// Transactions dropped because their year differs from the fiscal year
    pub pruned: Vec<Transaction>,
}

pub struct SettingsService<'a> {
    storage: &'a Storage,
}

impl<'a> SettingsService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create default settings, an empty transaction store and the default
    /// currency where absent, then reload. Safe to call repeatedly.
    pub fn init_database(&self) -> QuarterbookResult<Settings> {
        let _guard = self.storage.begin_commit()?;

        let created = !self.storage.is_initialized();
        initialize_storage(self.storage.paths(), Local::now().year())?;

        self.storage.settings.load()?;
        self.storage.transactions.load()?;
        self.storage.preferences.load()?;

        let settings = self.storage.settings.get()?;
        if created {
            self.storage.log_create(
                EntityType::Settings,
                SETTINGS_ID.to_string(),
                None,
                &settings,
            );
        }
        Ok(settings)
    }

    /// The settings record; `NotFound` before `init_database`
    pub fn get(&self) -> QuarterbookResult<Settings> {
        self.storage.settings.get()
    }

    /// Replace the four quarter boundaries, keeping the fiscal year, then
    /// delete every transaction whose year is not the fiscal year
    pub fn update_quarters(&self, boundaries: QuarterBoundaries) -> QuarterbookResult<SettingsUpdate> {
        let _guard = self.storage.begin_commit()?;

        let before = self.storage.settings.get()?;
        let after = Settings::with_boundaries(before.year, boundaries);

        self.storage.settings.set(after.clone())?;
        if let Err(e) = self.storage.settings.save() {
            self.storage.settings.set(before)?;
            return Err(e);
        }

        let pruned = self.storage.transactions.retain_year(after.year)?;
        if !pruned.is_empty() {
            if let Err(e) = self.storage.transactions.save() {
                // Settings are already on disk; keep memory in line with the
                // transaction blob that failed to change
                for txn in &pruned {
                    self.storage.transactions.insert(txn.clone())?;
                }
                return Err(e);
            }
        }

        let mut entries = vec![AuditEntry::update(
            EntityType::Settings,
            SETTINGS_ID.to_string(),
            None,
            &before,
            &after,
        )];
        entries.extend(pruned.iter().map(|txn| {
            AuditEntry::delete(
                EntityType::Transaction,
                txn.id.to_string(),
                Some(txn.description.clone()),
                txn,
            )
        }));
        self.storage.log_batch(&entries);

        if pruned.is_empty() {
            info!(year = after.year, "updated quarter boundaries");
        } else {
            warn!(
                year = after.year,
                pruned = pruned.len(),
                "updated quarter boundaries and pruned other years"
            );
        }

        Ok(SettingsUpdate {
            settings: after,
            pruned,
        })
    }
}
