use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use quarterbook::cli::{
    handle_audit_command, handle_export_command, handle_import_command, handle_prefs_command,
    handle_settings_command, handle_totals_command, handle_transaction_command, ExportArgs,
    PrefsCommands, SettingsCommands, TransactionCommands,
};
use quarterbook::config::paths::QuarterbookPaths;
use quarterbook::display::format_settings;
use quarterbook::log::init_logging;
use quarterbook::services::{PreferenceService, SettingsService};
use quarterbook::storage::Storage;

#[derive(Parser)]
#[command(
    name = "quarterbook",
    version,
    about = "Quarter-based income and expenditure tracker",
    long_about = "Quarterbook records income and expenditure against fiscal quarters, \
                  totals them per quarter and year, and exports or imports them \
                  as CSV or XLSX files."
)]
struct Cli {
    /// Print diagnostic logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default settings and an empty transaction store
    Init,

    /// Show current configuration and paths
    Config,

    /// Transaction management commands
    #[command(subcommand, alias = "transaction")]
    Txn(TransactionCommands),

    /// Per-quarter and yearly totals
    Totals {
        /// Defaults to the fiscal year
        #[arg(short, long)]
        year: Option<i32>,
        /// Show tax-inclusive totals
        #[arg(long)]
        with_tax: bool,
    },

    /// Fiscal year and quarter boundaries
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Currency, language and display preferences
    #[command(subcommand)]
    Prefs(PrefsCommands),

    /// Export transactions to the exports directory
    Export(ExportArgs),

    /// Import transactions from a CSV or spreadsheet file
    Import {
        file: PathBuf,
    },

    /// Show recent audit log entries
    Audit {
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = QuarterbookPaths::new()?;
    let storage = Storage::open(paths.clone())?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing Quarterbook at: {}", paths.base_dir().display());
            let settings = SettingsService::new(&storage).init_database()?;
            println!("Initialization complete!");
            println!();
            print!("{}", format_settings(&settings));
        }
        Some(Commands::Config) => {
            let prefs = PreferenceService::new(&storage).get()?;
            println!("Quarterbook Configuration");
            println!("=========================");
            println!("Base directory:    {}", paths.base_dir().display());
            println!("Data directory:    {}", paths.data_dir().display());
            println!("Exports directory: {}", paths.exports_dir().display());
            println!("Audit log:         {}", paths.audit_log().display());
            println!("Initialized:       {}", storage.is_initialized());
            println!();
            print!("{}", quarterbook::cli::prefs::format_preferences(&prefs));
        }
        Some(Commands::Txn(cmd)) => {
            require_init(&storage)?;
            handle_transaction_command(&storage, cmd)?;
        }
        Some(Commands::Totals { year, with_tax }) => {
            require_init(&storage)?;
            handle_totals_command(&storage, year, with_tax)?;
        }
        Some(Commands::Settings(cmd)) => {
            require_init(&storage)?;
            handle_settings_command(&storage, cmd)?;
        }
        Some(Commands::Prefs(cmd)) => handle_prefs_command(&storage, cmd)?,
        Some(Commands::Export(args)) => handle_export_command(&storage, args)?,
        Some(Commands::Import { file }) => handle_import_command(&storage, &file)?,
        Some(Commands::Audit { limit }) => handle_audit_command(&storage, limit)?,
        None => {
            println!("Quarterbook - quarterly income and expenditure tracking");
            println!();
            println!("Run 'quarterbook --help' for usage information.");
            println!("Run 'quarterbook init' to get started.");
        }
    }

    Ok(())
}

fn require_init(storage: &Storage) -> Result<()> {
    if !storage.is_initialized() {
        bail!("Quarterbook is not initialized. Run 'quarterbook init' first.");
    }
    Ok(())
}
