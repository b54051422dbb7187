//! Import service
//!
//! Reads CSV (`.csv`) or spreadsheet (`.xlsx`, `.xls`, `.ods`) files whose
//! first row names the columns, turns each row into a new transaction and
//! stores the valid ones in a single commit. Rows missing `Quarter`, `Type`,
//! `Amount`, `Date` or `Year`, or holding values that don't parse, are
//! skipped and counted. Nothing is deduplicated against existing data.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::error::{QuarterbookError, QuarterbookResult};
use crate::export::SHEET_NAME;
use crate::models::{Money, NewTransaction, Quarter, TaxRate, TransactionType};
use crate::services::TransactionService;
use crate::storage::Storage;

/// One data row keyed by header text
pub type ImportRow = HashMap<String, String>;

/// Columns every importable row needs, non-empty
pub const REQUIRED_COLUMNS: [&str; 5] = ["Quarter", "Type", "Amount", "Date", "Year"];

/// Counts from one import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportOutcome {
    pub imported: usize,
    pub skipped: usize,
}

impl ImportOutcome {
    pub fn message(&self) -> String {
        if self.imported == 0 {
            "No valid rows found".to_string()
        } else {
            format!("Imported {} rows", self.imported)
        }
    }
}

impl fmt::Display for ImportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Why a row was not imported
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    Missing(&'static str),
    Invalid { column: &'static str, value: String },
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowError::Missing(column) => write!(f, "missing {}", column),
            RowError::Invalid { column, value } => write!(f, "invalid {} '{}'", column, value),
        }
    }
}

fn field<'r>(row: &'r ImportRow, column: &str) -> Option<&'r str> {
    row.get(column).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn required<'r>(row: &'r ImportRow, column: &'static str) -> Result<&'r str, RowError> {
    field(row, column).ok_or(RowError::Missing(column))
}

fn invalid(column: &'static str, value: &str) -> RowError {
    RowError::Invalid {
        column,
        value: value.to_string(),
    }
}

/// Turn one row into creation input. `ID` is ignored; a missing
/// `Receipt Amount` is recomputed from amount and tax.
pub fn parse_row(row: &ImportRow) -> Result<NewTransaction, RowError> {
    for column in REQUIRED_COLUMNS {
        required(row, column)?;
    }

    let raw = required(row, "Quarter")?;
    let quarter: Quarter = raw.parse().map_err(|_| invalid("Quarter", raw))?;

    let raw = required(row, "Type")?;
    let kind = TransactionType::parse(&raw.to_lowercase()).ok_or_else(|| invalid("Type", raw))?;

    let raw = required(row, "Amount")?;
    let amount = Money::parse(raw).map_err(|_| invalid("Amount", raw))?;

    let raw = required(row, "Date")?;
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid("Date", raw))?;

    let raw = required(row, "Year")?;
    let year: i32 = raw.parse().map_err(|_| invalid("Year", raw))?;

    let tax = match field(row, "Tax") {
        Some(raw) => TaxRate::parse(raw).map_err(|_| invalid("Tax", raw))?,
        None => TaxRate::zero(),
    };

    let mut input = NewTransaction::new(quarter, kind, amount, date)
        .with_tax(tax)
        .with_year(year);

    if let Some(raw) = field(row, "Receipt Amount") {
        input.receipt_amount = Money::parse(raw).map_err(|_| invalid("Receipt Amount", raw))?;
    }
    if let Some(description) = row.get("Description") {
        input.description = description.trim().to_string();
    }

    Ok(input)
}

/// Rows of a CSV document; rows the reader can't decode come back as `None`
pub fn read_csv_rows<R: std::io::Read>(reader: R) -> QuarterbookResult<Vec<Option<ImportRow>>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| QuarterbookError::Import(format!("Failed to read header row: {}", e)))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let rows: Vec<Option<ImportRow>> = csv_reader
        .records()
        .map(|record| {
            record.ok().map(|record| {
                headers
                    .iter()
                    .cloned()
                    .zip(record.iter().map(str::to_string))
                    .collect()
            })
        })
        .collect();

    Ok(rows)
}

/// Cell text as a spreadsheet shows it: whole floats without `.0`, dates
/// as `YYYY-MM-DD`
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64())
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    }
}

/// Excel day serial to a date (epoch 1899-12-30); `None` for serials that
/// are not finite or land outside chrono's date range
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial.abs() > f64::from(i32::MAX) {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(chrono::Duration::try_days(serial.floor() as i64)?)
}

/// Rows of the `Transactions` sheet, or the first sheet when there is none.
/// Fully blank rows are dropped.
pub fn read_spreadsheet_rows(path: &Path) -> QuarterbookResult<Vec<Option<ImportRow>>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| QuarterbookError::Import(format!("Failed to open {}: {}", path.display(), e)))?;

    let names = workbook.sheet_names();
    let sheet = names
        .iter()
        .find(|n| n.as_str() == SHEET_NAME)
        .or_else(|| names.first())
        .cloned()
        .ok_or_else(|| QuarterbookError::Import(format!("{} has no sheets", path.display())))?;

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| QuarterbookError::Import(format!("Failed to read sheet {}: {}", sheet, e)))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|c| cell_text(c).trim().to_string()).collect(),
        None => return Ok(Vec::new()),
    };

    Ok(rows
        .map(|cells| cells.iter().map(cell_text).collect::<Vec<_>>())
        .filter(|cells| cells.iter().any(|c| !c.trim().is_empty()))
        .map(|cells| Some(headers.iter().cloned().zip(cells).collect()))
        .collect())
}

/// Read rows from a file, choosing the reader by extension
pub fn read_rows(path: &Path) -> QuarterbookResult<Vec<Option<ImportRow>>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).map_err(|e| {
                QuarterbookError::Import(format!("Failed to open {}: {}", path.display(), e))
            })?;
            read_csv_rows(file)
        }
        "xlsx" | "xls" | "xlsm" | "ods" => read_spreadsheet_rows(path),
        _ => Err(QuarterbookError::Import(format!(
            "Unsupported file type: {} (expected .csv, .xlsx, .xls or .ods)",
            path.display()
        ))),
    }
}

/// Service for importing transaction files
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Import every valid row of `path`
    pub fn import_file(&self, path: &Path) -> QuarterbookResult<ImportOutcome> {
        let rows = read_rows(path)?;
        self.import_rows(rows)
    }

    /// Store the valid rows; `None` entries count as skipped
    pub fn import_rows(&self, rows: Vec<Option<ImportRow>>) -> QuarterbookResult<ImportOutcome> {
        let mut outcome = ImportOutcome::default();
        let mut inputs = Vec::new();

        for (i, row) in rows.iter().enumerate() {
            // Header is line 1
            let line = i + 2;
            match row.as_ref().map(parse_row) {
                Some(Ok(input)) => inputs.push(input),
                Some(Err(reason)) => {
                    debug!(line, %reason, "skipping import row");
                    outcome.skipped += 1;
                }
                None => {
                    debug!(line, "skipping unreadable import row");
                    outcome.skipped += 1;
                }
            }
        }

        outcome.imported = TransactionService::new(self.storage)
            .add_batch(inputs)?
            .len();

        info!(
            imported = outcome.imported,
            skipped = outcome.skipped,
            "import finished"
        );
        Ok(outcome)
    }
}
