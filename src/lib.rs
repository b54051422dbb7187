//! Quarterbook - quarter-based income and expenditure tracking
//!
//! Transactions are booked against one of four fiscal quarters and a year.
//! The library keeps them in a small JSON store, totals them per quarter,
//! and moves them in and out of CSV and XLSX files.
//!
//! # Architecture
//!
//! - `config`: Path resolution and user preferences
//! - `error`: Custom error types
//! - `models`: Transactions, settings and the value types behind them
//! - `storage`: Per-key JSON/text blobs with atomic writes
//! - `services`: Business logic (transactions, settings, totals, import)
//! - `export`: CSV and XLSX export
//! - `audit`: Append-only audit log
//! - `cli` / `display`: Command handlers and terminal formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use quarterbook::config::paths::QuarterbookPaths;
//! use quarterbook::services::{SettingsService, TotalsService};
//! use quarterbook::storage::Storage;
//!
//! let storage = Storage::open(QuarterbookPaths::new()?)?;
//! SettingsService::new(&storage).init_database()?;
//! let totals = TotalsService::new(&storage).get_totals(2024)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod log;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{QuarterbookError, QuarterbookResult};
