//! Settings repository
//!
//! Singleton record stored in settings.json.

use std::path::PathBuf;
use std::sync::RwLock;

use tracing::debug;

use crate::error::QuarterbookError;
use crate::models::Settings;

use super::file_io::{read_json_optional, write_json_atomic};

pub struct SettingsRepository {
    path: PathBuf,
    data: RwLock<Option<Settings>>,
}

impl SettingsRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(None),
        }
    }

    /// Load the record from disk; absent file leaves the repository empty
    pub fn load(&self) -> Result<(), QuarterbookError> {
        let loaded: Option<Settings> = read_json_optional(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            QuarterbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *data = loaded;

        debug!(present = data.is_some(), "loaded settings");
        Ok(())
    }

    /// Write the current record; no-op when nothing is loaded
    pub fn save(&self) -> Result<(), QuarterbookError> {
        let data = self.data.read().map_err(|e| {
            QuarterbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        if let Some(settings) = data.as_ref() {
            write_json_atomic(&self.path, settings)?;
            debug!(year = settings.year, "committed settings");
        }
        Ok(())
    }

    /// The settings record, or `NotFound` before initialization
    pub fn get(&self) -> Result<Settings, QuarterbookError> {
        self.get_optional()?
            .ok_or_else(QuarterbookError::settings_not_found)
    }

    pub fn get_optional(&self) -> Result<Option<Settings>, QuarterbookError> {
        let data = self.data.read().map_err(|e| {
            QuarterbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.clone())
    }

    /// Replace the in-memory record, returning the previous one
    pub fn set(&self, settings: Settings) -> Result<Option<Settings>, QuarterbookError> {
        let mut data = self.data.write().map_err(|e| {
            QuarterbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.replace(settings))
    }
}
