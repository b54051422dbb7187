//! Storage layer for Quarterbook
//!
//! One blob per key under `data/`, written with atomic temp-file renames.
//! Repositories keep the loaded state in memory; `Storage` ties them together
//! with the audit log and the commit lock that serializes mutations.

pub mod file_io;
pub mod init;
pub mod preferences;
pub mod settings;
pub mod transactions;

pub use file_io::{read_json, write_bytes_atomic, write_json_atomic};
pub use init::initialize_storage;
pub use preferences::PreferenceRepository;
pub use settings::SettingsRepository;
pub use transactions::TransactionRepository;

use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use tracing::warn;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::QuarterbookPaths;
use crate::error::{QuarterbookError, QuarterbookResult};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: QuarterbookPaths,
    pub transactions: TransactionRepository,
    pub settings: SettingsRepository,
    pub preferences: PreferenceRepository,
    audit: AuditLogger,
    commit_lock: Mutex<()>,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: QuarterbookPaths) -> Result<Self, QuarterbookError> {
        paths.ensure_directories()?;

        Ok(Self {
            transactions: TransactionRepository::new(paths.transactions_file()),
            settings: SettingsRepository::new(paths.settings_file()),
            preferences: PreferenceRepository::new(&paths),
            audit: AuditLogger::new(paths.audit_log()),
            commit_lock: Mutex::new(()),
            paths,
        })
    }

    /// Open storage at `paths` and load every repository
    pub fn open(paths: QuarterbookPaths) -> Result<Self, QuarterbookError> {
        let mut storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &QuarterbookPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), QuarterbookError> {
        self.settings.load()?;
        self.transactions.load()?;
        self.preferences.load()?;
        Ok(())
    }

    /// Check if storage has been initialized (settings record exists)
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Hold this for the whole read-modify-write of a mutation
    pub fn begin_commit(&self) -> QuarterbookResult<MutexGuard<'_, ()>> {
        self.commit_lock
            .lock()
            .map_err(|e| QuarterbookError::Storage(format!("Commit lock poisoned: {}", e)))
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        self.record(&[AuditEntry::create(entity_type, entity_id, entity_name, entity)]);
    }

    pub fn log_update<B: Serialize, A: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &B,
        after: &A,
    ) {
        self.record(&[AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        )]);
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        self.record(&[AuditEntry::delete(entity_type, entity_id, entity_name, entity)]);
    }

    pub fn log_batch(&self, entries: &[AuditEntry]) {
        self.record(entries);
    }

    /// Audit entries describe changes that are already on disk, so a failed
    /// append is logged and never reported as a failed mutation
    fn record(&self, entries: &[AuditEntry]) {
        if let Err(e) = self.audit.log_batch(entries) {
            warn!(
                error = %e,
                entries = entries.len(),
                path = %self.audit.path().display(),
                "failed to append audit log"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = QuarterbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(temp_dir.path().join("exports").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_open_after_init() {
        let temp_dir = TempDir::new().unwrap();
        let paths = QuarterbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths, 2024).unwrap();

        let storage = Storage::open(paths).unwrap();
        assert!(storage.is_initialized());
        assert_eq!(storage.settings.get().unwrap().year, 2024);
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_audit_helpers_append() {
        let temp_dir = TempDir::new().unwrap();
        let paths = QuarterbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        {
            let _guard = storage.begin_commit().unwrap();
            storage
                .log_update(EntityType::Preference, "language", None, &json!("en"), &json!("fr"));
        }

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Update);
        assert_eq!(entries[0].diff_summary.as_deref(), Some("\"en\" -> \"fr\""));
    }

    #[test]
    fn test_audit_failure_is_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let paths = QuarterbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        std::fs::create_dir_all(storage.audit().path()).unwrap();

        storage.log_create(EntityType::Settings, "1", None, &json!({"year": 2024}));
        assert!(storage.audit().read_all().is_err());
    }
}
