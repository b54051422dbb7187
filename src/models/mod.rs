//! Core data models for Quarterbook
//!
//! Transactions booked against fiscal quarters, the fiscal settings record,
//! and the value types they are built from.

pub mod ids;
pub mod money;
pub mod quarter;
pub mod settings;
pub mod tax;
pub mod transaction;

pub use ids::TransactionId;
pub use money::{Money, MoneyParseError};
pub use quarter::{MonthDay, Quarter};
pub use settings::{QuarterBoundaries, Settings};
pub use tax::TaxRate;
pub use transaction::{NewTransaction, Transaction, TransactionType};
