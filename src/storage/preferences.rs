//! Preference repository
//!
//! Each preference is its own plain-text blob: `user_currency`, `language`,
//! `darkMode` and `introSeen`. Missing or unrecognised values read as the
//! default.

use std::path::PathBuf;
use std::sync::RwLock;

use tracing::{debug, warn};

use crate::config::paths::{
    QuarterbookPaths, CURRENCY_KEY, DARK_MODE_KEY, INTRO_SEEN_KEY, LANGUAGE_KEY,
};
use crate::config::{Currency, Language, Preferences};
use crate::error::QuarterbookError;

use super::file_io::{read_text, write_text_atomic};

pub struct PreferenceRepository {
    currency_file: PathBuf,
    language_file: PathBuf,
    dark_mode_file: PathBuf,
    intro_seen_file: PathBuf,
    data: RwLock<Preferences>,
}

fn parse_flag(key: &str, raw: Option<String>) -> bool {
    match raw.as_deref() {
        None => false,
        Some("true") => true,
        Some("false") => false,
        Some(other) => {
            warn!(key, value = other, "ignoring unrecognised flag value");
            false
        }
    }
}

impl PreferenceRepository {
    pub fn new(paths: &QuarterbookPaths) -> Self {
        Self {
            currency_file: paths.blob_file(CURRENCY_KEY),
            language_file: paths.blob_file(LANGUAGE_KEY),
            dark_mode_file: paths.blob_file(DARK_MODE_KEY),
            intro_seen_file: paths.blob_file(INTRO_SEEN_KEY),
            data: RwLock::new(Preferences::default()),
        }
    }

    /// Read every preference blob
    pub fn load(&self) -> Result<(), QuarterbookError> {
        let currency = match read_text(&self.currency_file)? {
            Some(code) => Currency::parse(&code).unwrap_or_else(|| {
                warn!(key = CURRENCY_KEY, value = %code, "unknown currency, using default");
                Currency::default()
            }),
            None => Currency::default(),
        };
        let language = match read_text(&self.language_file)? {
            Some(code) => Language::parse(&code).unwrap_or_else(|| {
                warn!(key = LANGUAGE_KEY, value = %code, "unknown language, using default");
                Language::default()
            }),
            None => Language::default(),
        };
        let dark_mode = parse_flag(DARK_MODE_KEY, read_text(&self.dark_mode_file)?);
        let intro_seen = parse_flag(INTRO_SEEN_KEY, read_text(&self.intro_seen_file)?);

        let mut data = self.data.write().map_err(|e| {
            QuarterbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *data = Preferences {
            currency,
            language,
            dark_mode,
            intro_seen,
        };

        debug!(currency = %currency, language = %language, "loaded preferences");
        Ok(())
    }

    /// Snapshot of the current preferences
    pub fn get(&self) -> Result<Preferences, QuarterbookError> {
        let data = self.data.read().map_err(|e| {
            QuarterbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.clone())
    }

    /// Persist a new currency, returning the previous one
    pub fn set_currency(&self, currency: Currency) -> Result<Currency, QuarterbookError> {
        self.update(|p| std::mem::replace(&mut p.currency, currency), || {
            write_text_atomic(&self.currency_file, currency.code())
        })
    }

    /// Persist a new language, returning the previous one
    pub fn set_language(&self, language: Language) -> Result<Language, QuarterbookError> {
        self.update(|p| std::mem::replace(&mut p.language, language), || {
            write_text_atomic(&self.language_file, language.code())
        })
    }

    pub fn set_dark_mode(&self, enabled: bool) -> Result<bool, QuarterbookError> {
        self.update(|p| std::mem::replace(&mut p.dark_mode, enabled), || {
            write_text_atomic(&self.dark_mode_file, &enabled.to_string())
        })
    }

    pub fn set_intro_seen(&self, seen: bool) -> Result<bool, QuarterbookError> {
        self.update(|p| std::mem::replace(&mut p.intro_seen, seen), || {
            write_text_atomic(&self.intro_seen_file, &seen.to_string())
        })
    }

    /// Write the blob first; memory only changes once the write succeeded
    fn update<T>(
        &self,
        apply: impl FnOnce(&mut Preferences) -> T,
        write: impl FnOnce() -> Result<(), QuarterbookError>,
    ) -> Result<T, QuarterbookError> {
        let mut data = self.data.write().map_err(|e| {
            QuarterbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        write()?;
        Ok(apply(&mut data))
    }
}
