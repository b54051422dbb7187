//! Path management for Quarterbook
//!
//! Provides XDG-compliant path resolution for the data blobs, exports and the
//! audit log.
//!
//! ## Path Resolution Order
//!
//! 1. `QUARTERBOOK_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/quarterbook` or `~/.config/quarterbook`
//! 3. Windows: `%APPDATA%\quarterbook`

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::QuarterbookError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "QUARTERBOOK_DATA_DIR";

/// Blob key for the fiscal settings record
pub const SETTINGS_KEY: &str = "settings";
/// Blob key for the transaction array
pub const TRANSACTIONS_KEY: &str = "transactions";
/// Blob key for the preferred currency
pub const CURRENCY_KEY: &str = "user_currency";
/// Blob key for the preferred language
pub const LANGUAGE_KEY: &str = "language";
/// Blob key for the dark mode flag
pub const DARK_MODE_KEY: &str = "darkMode";
/// Blob key for the intro-seen flag
pub const INTRO_SEEN_KEY: &str = "introSeen";

/// Manages all paths used by Quarterbook
#[derive(Debug, Clone)]
pub struct QuarterbookPaths {
    /// Base directory for all Quarterbook data
    base_dir: PathBuf,
}

impl QuarterbookPaths {
    /// Create a new QuarterbookPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the platform config directory cannot be determined.
    pub fn new() -> Result<Self, QuarterbookError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create QuarterbookPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/quarterbook/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory holding one file per stored key
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the directory export files are written to
    pub fn exports_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the file backing a plain-text key
    pub fn blob_file(&self, key: &str) -> PathBuf {
        self.data_dir().join(key)
    }

    /// Get the path to settings.json
    pub fn settings_file(&self) -> PathBuf {
        self.data_dir().join(format!("{}.json", SETTINGS_KEY))
    }

    /// Get the path to transactions.json
    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join(format!("{}.json", TRANSACTIONS_KEY))
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), QuarterbookError> {
        std::fs::create_dir_all(&self.base_dir).map_err(|e| {
            QuarterbookError::Io(format!("Failed to create base directory: {}", e))
        })?;

        std::fs::create_dir_all(self.data_dir()).map_err(|e| {
            QuarterbookError::Io(format!("Failed to create data directory: {}", e))
        })?;

        std::fs::create_dir_all(self.exports_dir()).map_err(|e| {
            QuarterbookError::Io(format!("Failed to create exports directory: {}", e))
        })?;

        Ok(())
    }

    /// Check if Quarterbook has been initialized (settings record exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, QuarterbookError> {
    // Unix (Linux/macOS): Use XDG_CONFIG_HOME if set, otherwise ~/.config
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg).join("quarterbook"));
    }
    let base = BaseDirs::new()
        .ok_or_else(|| QuarterbookError::Config("Could not determine home directory".into()))?;
    Ok(base.home_dir().join(".config").join("quarterbook"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, QuarterbookError> {
    let base = BaseDirs::new()
        .ok_or_else(|| QuarterbookError::Config("Could not determine APPDATA directory".into()))?;
    Ok(base.config_dir().join("quarterbook"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = QuarterbookPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.exports_dir(), temp_dir.path().join("exports"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = QuarterbookPaths::with_base_dir(temp_dir.path().to_path_buf());

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
        assert!(paths.exports_dir().exists());
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = QuarterbookPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(
            paths.settings_file(),
            temp_dir.path().join("data").join("settings.json")
        );
        assert_eq!(
            paths.transactions_file(),
            temp_dir.path().join("data").join("transactions.json")
        );
        assert_eq!(
            paths.blob_file(CURRENCY_KEY),
            temp_dir.path().join("data").join("user_currency")
        );
    }
}
