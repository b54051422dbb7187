//! Fiscal settings CLI commands

use clap::Subcommand;

use crate::display::format_settings;
use crate::error::{QuarterbookError, QuarterbookResult};
use crate::models::{MonthDay, QuarterBoundaries};
use crate::services::SettingsService;
use crate::storage::Storage;

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show the fiscal year and quarter boundaries
    Show,
    /// Replace the quarter boundaries (MM-DD each)
    ///
    /// Transactions whose year differs from the fiscal year are deleted.
    Quarters {
        q1: String,
        q2: String,
        q3: String,
        q4: String,
        /// Confirm deletion of transactions outside the fiscal year
        #[arg(long)]
        yes: bool,
    },
}

pub fn handle_settings_command(storage: &Storage, cmd: SettingsCommands) -> QuarterbookResult<()> {
    let service = SettingsService::new(storage);

    match cmd {
        SettingsCommands::Show => {
            print!("{}", format_settings(&service.get()?));
        }

        SettingsCommands::Quarters { q1, q2, q3, q4, yes } => {
            let mut starts = Vec::with_capacity(4);
            for raw in [&q1, &q2, &q3, &q4] {
                starts.push(
                    MonthDay::parse(raw)
                        .map_err(|e| QuarterbookError::Validation(e.to_string()))?,
                );
            }
            let boundaries = QuarterBoundaries([starts[0], starts[1], starts[2], starts[3]]);

            let fiscal_year = service.get()?.year;
            let doomed = storage
                .transactions
                .get_all()?
                .iter()
                .filter(|t| t.year != fiscal_year)
                .count();

            if doomed > 0 && !yes {
                println!(
                    "WARNING: {} transaction(s) outside fiscal year {} will be deleted.",
                    doomed, fiscal_year
                );
                println!("To proceed, run again with --yes flag:");
                println!(
                    "  quarterbook settings quarters {} {} {} {} --yes",
                    q1, q2, q3, q4
                );
                return Ok(());
            }

            let update = service.update_quarters(boundaries)?;
            println!("Quarter boundaries updated.");
            print!("{}", format_settings(&update.settings));
            if !update.pruned.is_empty() {
                println!("Deleted {} transaction(s).", update.pruned.len());
            }
        }
    }

    Ok(())
}
