//! CLI command for importing CSV or spreadsheet files

use std::path::Path;

use crate::error::QuarterbookResult;
use crate::services::ImportService;
use crate::storage::Storage;

pub fn handle_import_command(storage: &Storage, file: &Path) -> QuarterbookResult<()> {
    let outcome = ImportService::new(storage).import_file(file)?;

    println!("{}", outcome);
    if outcome.skipped > 0 {
        println!("Skipped {} invalid row(s)", outcome.skipped);
    }

    Ok(())
}
