//! Service layer for Quarterbook
//!
//! Operations on top of the storage layer: each mutation takes the commit
//! lock, persists, and appends to the audit log.

pub mod import;
pub mod preferences;
pub mod settings;
pub mod totals;
pub mod transaction;

pub use import::{ImportOutcome, ImportService};
pub use preferences::PreferenceService;
pub use settings::{SettingsService, SettingsUpdate};
pub use totals::{compute_totals, QuarterTotals, TotalsService, YearTotals};
pub use transaction::TransactionService;
