//! CLI command for data export

use clap::Args;

use crate::error::{QuarterbookError, QuarterbookResult};
use crate::export::{export_data, ExportFilter, ExportFormat, QuarterFilter, TypeFilter};
use crate::storage::Storage;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Only transactions booked against this year
    #[arg(short, long)]
    pub year: Option<i32>,
    /// all, or a quarter 1-4
    #[arg(short, long, default_value = "all")]
    pub quarter: String,
    /// both, income or expenditure
    #[arg(short = 't', long = "type", default_value = "both")]
    pub kind: String,
    /// csv or xlsx
    #[arg(short, long, default_value = "csv")]
    pub format: String,
}

/// Handle the export command
pub fn handle_export_command(storage: &Storage, args: ExportArgs) -> QuarterbookResult<()> {
    let filter = ExportFilter {
        year: args.year,
        quarter: args
            .quarter
            .parse::<QuarterFilter>()
            .map_err(QuarterbookError::Validation)?,
        kind: args
            .kind
            .parse::<TypeFilter>()
            .map_err(QuarterbookError::Validation)?,
    };
    let format = args
        .format
        .parse::<ExportFormat>()
        .map_err(QuarterbookError::Validation)?;

    let path = export_data(storage, &filter, format)?;
    println!("Exported to {}", path.display());

    Ok(())
}
