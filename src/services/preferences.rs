//! Preference service
//!
//! Loads the preference context and persists single-key changes with an
//! audit entry for each one that actually changed.

use std::fmt::Display;

use serde::Serialize;
use tracing::info;

use crate::audit::EntityType;
use crate::config::paths::{CURRENCY_KEY, DARK_MODE_KEY, INTRO_SEEN_KEY, LANGUAGE_KEY};
use crate::config::{Currency, Language, Preferences};
use crate::error::QuarterbookResult;
use crate::storage::Storage;

pub struct PreferenceService<'a> {
    storage: &'a Storage,
}

impl<'a> PreferenceService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn get(&self) -> QuarterbookResult<Preferences> {
        self.storage.preferences.get()
    }

    pub fn set_currency(&self, currency: Currency) -> QuarterbookResult<Preferences> {
        let _guard = self.storage.begin_commit()?;
        let previous = self.storage.preferences.set_currency(currency)?;
        self.record(CURRENCY_KEY, previous, currency)?;
        self.get()
    }

    pub fn set_language(&self, language: Language) -> QuarterbookResult<Preferences> {
        let _guard = self.storage.begin_commit()?;
        let previous = self.storage.preferences.set_language(language)?;
        self.record(LANGUAGE_KEY, previous, language)?;
        self.get()
    }

    pub fn set_dark_mode(&self, enabled: bool) -> QuarterbookResult<Preferences> {
        let _guard = self.storage.begin_commit()?;
        let previous = self.storage.preferences.set_dark_mode(enabled)?;
        self.record(DARK_MODE_KEY, previous, enabled)?;
        self.get()
    }

    pub fn set_intro_seen(&self, seen: bool) -> QuarterbookResult<Preferences> {
        let _guard = self.storage.begin_commit()?;
        let previous = self.storage.preferences.set_intro_seen(seen)?;
        self.record(INTRO_SEEN_KEY, previous, seen)?;
        self.get()
    }

    fn record<T>(&self, key: &'static str, before: T, after: T) -> QuarterbookResult<()>
    where
        T: PartialEq + Serialize + Display,
    {
        if before == after {
            return Ok(());
        }
        info!(key, from = %before, to = %after, "preference changed");
        self.storage
            .log_update(EntityType::Preference, key, None, &before, &after);
        Ok(())
    }
}
