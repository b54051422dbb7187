//! Totals CLI command

use crate::display::format_totals;
use crate::error::QuarterbookResult;
use crate::services::{PreferenceService, TotalsService};
use crate::storage::Storage;

use super::resolve_year;

/// Print per-quarter and yearly totals
pub fn handle_totals_command(
    storage: &Storage,
    year: Option<i32>,
    with_tax: bool,
) -> QuarterbookResult<()> {
    let year = resolve_year(storage, year)?;
    let currency = PreferenceService::new(storage).get()?.currency;

    let totals = TotalsService::new(storage).year_totals(year)?;
    print!("{}", format_totals(&totals, currency, with_tax));

    Ok(())
}
