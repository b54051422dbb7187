//! Configuration module for Quarterbook
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User preferences (currency, language, display flags)

pub mod paths;
pub mod preferences;

pub use paths::QuarterbookPaths;
pub use preferences::{Currency, Language, Preferences};
