//! Export of filtered transactions to CSV or XLSX
//!
//! - CSV: every field quoted, `\n` line endings
//! - XLSX: one sheet named `Transactions`
//!
//! Both share the column set in [`COLUMNS`]. Files land in the exports
//! directory as
//! `accounting_export_{year|all}_{quarter|all}_{type|both}_{YYYY-MM-DD_HH-mm}.{ext}`;
//! two exports with the same filters in the same minute overwrite each other.

pub mod csv;
pub mod xlsx;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use tracing::info;

use crate::error::{QuarterbookError, QuarterbookResult};
use crate::models::{Quarter, Transaction, TransactionType};
use crate::storage::{write_bytes_atomic, Storage};

pub use self::csv::{transactions_to_csv, write_transactions_csv};
pub use self::xlsx::{transactions_to_xlsx, SHEET_NAME};

/// Header row shared by CSV and XLSX exports
pub const COLUMNS: [&str; 9] = [
    "ID",
    "Quarter",
    "Type",
    "Amount",
    "Tax",
    "Receipt Amount",
    "Description",
    "Date",
    "Year",
];

/// `All` or a single quarter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuarterFilter {
    #[default]
    All,
    Only(Quarter),
}

impl QuarterFilter {
    pub fn matches(&self, quarter: Quarter) -> bool {
        match self {
            Self::All => true,
            Self::Only(q) => *q == quarter,
        }
    }
}

impl FromStr for QuarterFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<Quarter>().map(Self::Only)
    }
}

impl fmt::Display for QuarterFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Only(q) => write!(f, "{}", q.number()),
        }
    }
}

/// `Both` or a single transaction type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    Both,
    Only(TransactionType),
}

impl TypeFilter {
    pub fn matches(&self, kind: TransactionType) -> bool {
        match self {
            Self::Both => true,
            Self::Only(k) => *k == kind,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("both") {
            return Ok(Self::Both);
        }
        TransactionType::parse(&s.to_lowercase())
            .map(Self::Only)
            .ok_or_else(|| format!("invalid type '{}', expected both, income or expenditure", s))
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Both => write!(f, "both"),
            Self::Only(k) => write!(f, "{}", k),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            other => Err(format!("unsupported export format '{}'", other)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Which transactions an export contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportFilter {
    /// Exact match on the stored year; `None` keeps every year
    pub year: Option<i32>,
    pub quarter: QuarterFilter,
    pub kind: TypeFilter,
}

impl ExportFilter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        self.year.map_or(true, |y| txn.year == y)
            && self.quarter.matches(txn.quarter)
            && self.kind.matches(txn.kind)
    }

    /// Keep matching transactions, preserving order
    pub fn apply(&self, transactions: Vec<Transaction>) -> Vec<Transaction> {
        transactions.into_iter().filter(|t| self.matches(t)).collect()
    }
}

/// File name for an export taken at `at`
pub fn export_file_name(filter: &ExportFilter, format: ExportFormat, at: NaiveDateTime) -> String {
    let year = filter
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "all".to_string());
    format!(
        "accounting_export_{}_{}_{}_{}.{}",
        year,
        filter.quarter,
        filter.kind,
        at.format("%Y-%m-%d_%H-%M"),
        format.extension()
    )
}

/// Encode already-filtered transactions in `format`
pub fn encode(transactions: &[Transaction], format: ExportFormat) -> QuarterbookResult<Vec<u8>> {
    match format {
        ExportFormat::Csv => transactions_to_csv(transactions),
        ExportFormat::Xlsx => transactions_to_xlsx(transactions),
    }
}

/// Filter the store, write the file into the exports directory and return
/// its path
pub fn export_data(
    storage: &Storage,
    filter: &ExportFilter,
    format: ExportFormat,
) -> QuarterbookResult<PathBuf> {
    let transactions = filter.apply(storage.transactions.get_all()?);
    let bytes = encode(&transactions, format)?;

    let path = storage
        .paths()
        .exports_dir()
        .join(export_file_name(filter, format, Local::now().naive_local()));
    write_bytes_atomic(&path, &bytes)
        .map_err(|e| QuarterbookError::Export(format!("{}: {}", path.display(), e)))?;

    info!(rows = transactions.len(), path = %path.display(), "exported transactions");
    Ok(path)
}
