//! Storage initialization
//!
//! First-run setup: default settings, an empty transaction array and the
//! default currency. Existing blobs are never touched.

use tracing::info;

use crate::config::paths::{QuarterbookPaths, CURRENCY_KEY};
use crate::config::Currency;
use crate::error::QuarterbookError;
use crate::models::{Settings, Transaction};

use super::file_io::{write_json_atomic, write_text_atomic};

/// Create whichever default blobs are missing; `year` seeds new settings
pub fn initialize_storage(paths: &QuarterbookPaths, year: i32) -> Result<(), QuarterbookError> {
    paths.ensure_directories()?;

    if !paths.settings_file().exists() {
        write_json_atomic(paths.settings_file(), &Settings::default_for_year(year))?;
        info!(year, "created default settings");
    }

    if !paths.transactions_file().exists() {
        let empty: Vec<Transaction> = Vec::new();
        write_json_atomic(paths.transactions_file(), &empty)?;
        info!("created empty transaction store");
    }

    let currency_file = paths.blob_file(CURRENCY_KEY);
    if !currency_file.exists() {
        write_text_atomic(&currency_file, Currency::default().code())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MonthDay, QuarterBoundaries};
    use tempfile::TempDir;

    fn test_paths() -> (TempDir, QuarterbookPaths) {
        let temp_dir = TempDir::new().unwrap();
        let paths = QuarterbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        (temp_dir, paths)
    }

    #[test]
    fn test_initialize_storage() {
        let (_temp_dir, paths) = test_paths();
        assert!(!paths.is_initialized());

        initialize_storage(&paths, 2024).unwrap();

        assert!(paths.is_initialized());
        assert!(paths.exports_dir().exists());

        let settings: Settings =
            serde_json::from_str(&std::fs::read_to_string(paths.settings_file()).unwrap()).unwrap();
        assert_eq!(settings, Settings::default_for_year(2024));

        let raw = std::fs::read_to_string(paths.transactions_file()).unwrap();
        assert_eq!(raw.trim(), "[]");

        let currency = std::fs::read_to_string(paths.blob_file(CURRENCY_KEY)).unwrap();
        assert_eq!(currency, "USD");
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let (_temp_dir, paths) = test_paths();
        initialize_storage(&paths, 2024).unwrap();

        let custom = Settings::with_boundaries(
            2024,
            QuarterBoundaries([
                MonthDay::parse("04-06").unwrap(),
                MonthDay::parse("07-06").unwrap(),
                MonthDay::parse("10-06").unwrap(),
                MonthDay::parse("01-06").unwrap(),
            ]),
        );
        write_json_atomic(paths.settings_file(), &custom).unwrap();
        std::fs::write(paths.transactions_file(), "[{\"id\":1,\"quarter\":1,\"type\":\"income\",\"amount\":5,\"tax\":0,\"receipt_amount\":5,\"description\":\"\",\"date\":\"2024-01-02\",\"year\":2024}]").unwrap();
        std::fs::write(paths.blob_file(CURRENCY_KEY), "GBP").unwrap();

        initialize_storage(&paths, 2031).unwrap();

        let settings: Settings =
            serde_json::from_str(&std::fs::read_to_string(paths.settings_file()).unwrap()).unwrap();
        assert_eq!(settings, custom);

        let txns: Vec<Transaction> =
            serde_json::from_str(&std::fs::read_to_string(paths.transactions_file()).unwrap())
                .unwrap();
        assert_eq!(txns.len(), 1);

        let currency = std::fs::read_to_string(paths.blob_file(CURRENCY_KEY)).unwrap();
        assert_eq!(currency, "GBP");
    }
}
