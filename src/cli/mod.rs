//! CLI command handlers
//!
//! Each submodule owns a clap command (or subcommand enum) and the handler
//! that turns it into service calls. Raw arguments are checked here and bad
//! input surfaces as `QuarterbookError::Validation`.

pub mod audit;
pub mod export;
pub mod import;
pub mod prefs;
pub mod settings;
pub mod totals;
pub mod transaction;

pub use audit::handle_audit_command;
pub use export::{handle_export_command, ExportArgs};
pub use import::handle_import_command;
pub use prefs::{handle_prefs_command, PrefsCommands};
pub use settings::{handle_settings_command, SettingsCommands};
pub use totals::handle_totals_command;
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::NaiveDate;

use crate::error::{QuarterbookError, QuarterbookResult};
use crate::models::{Quarter, TransactionType};
use crate::services::SettingsService;
use crate::storage::Storage;

/// Strict `YYYY-MM-DD`
pub(crate) fn parse_date(s: &str) -> QuarterbookResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        QuarterbookError::Validation(format!("Invalid date format: '{}'. Use YYYY-MM-DD", s))
    })
}

pub(crate) fn parse_quarter(s: &str) -> QuarterbookResult<Quarter> {
    s.parse::<Quarter>()
        .map_err(|_| QuarterbookError::Validation(format!("Invalid quarter '{}'. Use 1-4", s)))
}

pub(crate) fn parse_type(s: &str) -> QuarterbookResult<TransactionType> {
    TransactionType::parse(&s.trim().to_lowercase()).ok_or_else(|| {
        QuarterbookError::Validation(format!(
            "Invalid type '{}'. Use 'income' or 'expenditure'",
            s
        ))
    })
}

/// `year` or, when omitted, the configured fiscal year
pub(crate) fn resolve_year(storage: &Storage, year: Option<i32>) -> QuarterbookResult<i32> {
    match year {
        Some(y) => Ok(y),
        None => Ok(SettingsService::new(storage).get()?.year),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_is_strict() {
        assert_eq!(
            parse_date("2024-02-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
        assert!(parse_date("01/02/2024").unwrap_err().is_validation());
        assert!(parse_date("2024-2-30").is_err());
    }

    #[test]
    fn test_parse_quarter_and_type() {
        assert_eq!(parse_quarter("3").unwrap(), Quarter::Q3);
        assert!(parse_quarter("0").unwrap_err().is_validation());
        assert_eq!(parse_type("Income").unwrap(), TransactionType::Income);
        assert!(parse_type("transfer").unwrap_err().is_validation());
    }
}
