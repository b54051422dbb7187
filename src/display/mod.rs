//! Display formatting for terminal output

pub mod totals;
pub mod transaction;

pub use totals::format_totals;
pub use transaction::{format_transaction_details, format_transaction_register, format_transaction_row};

use crate::models::Settings;

/// Fiscal year and quarter boundaries
pub fn format_settings(settings: &Settings) -> String {
    let mut output = format!("Fiscal year: {}\n", settings.year);
    for q in crate::models::Quarter::ALL {
        output.push_str(&format!("  {} starts {}\n", q, settings.start_of(q)));
    }
    output
}
