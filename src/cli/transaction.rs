//! Transaction CLI commands
//!
//! `txn add` validates the raw form fields (description, amount, tax, date)
//! and resolves the quarter from the date when none is given. `txn list`
//! prints one quarter/type/year bucket newest first; `txn delete` removes
//! by id.

use clap::Subcommand;

use crate::display::transaction::{format_transaction_details, format_transaction_register};
use crate::error::{QuarterbookError, QuarterbookResult};
use crate::models::{Money, NewTransaction, TaxRate, TransactionId};
use crate::services::{PreferenceService, SettingsService, TransactionService};
use crate::storage::Storage;

use super::{parse_date, parse_quarter, parse_type, resolve_year};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Add a new transaction
    Add {
        /// Quarter 1-4; resolved from the date when omitted
        #[arg(short, long)]
        quarter: Option<String>,
        /// income or expenditure
        #[arg(short = 't', long = "type")]
        kind: String,
        /// Amount (e.g. "100" or "49.95")
        #[arg(short, long)]
        amount: String,
        /// Tax percentage
        #[arg(long, default_value = "0")]
        tax: String,
        /// Receipt amount; defaults to amount plus tax
        #[arg(short, long)]
        receipt: Option<String>,
        /// Description
        #[arg(short = 'D', long)]
        description: Option<String>,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Year to book against; defaults to the date's year
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// List transactions of one quarter and type, newest first
    List {
        #[arg(short, long)]
        quarter: String,
        #[arg(short = 't', long = "type")]
        kind: String,
        /// Defaults to the fiscal year
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    cmd: TransactionCommands,
) -> QuarterbookResult<()> {
    let service = TransactionService::new(storage);
    let currency = PreferenceService::new(storage).get()?.currency;

    match cmd {
        TransactionCommands::Add {
            quarter,
            kind,
            amount,
            tax,
            receipt,
            description,
            date,
            year,
        } => {
            let description = description.unwrap_or_default().trim().to_string();
            if description.is_empty() {
                return Err(QuarterbookError::Validation(
                    "Description is required".into(),
                ));
            }

            let kind = parse_type(&kind)?;

            let amount = Money::parse(&amount).map_err(|e| {
                QuarterbookError::Validation(format!(
                    "Invalid amount format: '{}'. Use format like '100' or '49.95'. Error: {}",
                    amount, e
                ))
            })?;
            if amount.is_negative() {
                return Err(QuarterbookError::Validation(
                    "Amount must not be negative".into(),
                ));
            }

            let tax = TaxRate::parse(&tax)
                .map_err(|e| QuarterbookError::Validation(e.to_string()))?;

            let date = match date {
                Some(date_str) => parse_date(&date_str)?,
                None => chrono::Local::now().date_naive(),
            };

            let quarter = match quarter {
                Some(q) => parse_quarter(&q)?,
                None => SettingsService::new(storage).get()?.quarter_for_date(date),
            };

            let mut input = NewTransaction::new(quarter, kind, amount, date)
                .with_tax(tax)
                .with_description(description);
            if let Some(receipt) = receipt {
                input.receipt_amount = Money::parse(&receipt).map_err(|e| {
                    QuarterbookError::Validation(format!(
                        "Invalid receipt amount: '{}'. Error: {}",
                        receipt, e
                    ))
                })?;
            }
            if let Some(year) = year {
                input = input.with_year(year);
            }

            let txn = service.add(input)?;

            println!("Created transaction:");
            print!("{}", format_transaction_details(&txn, currency));
        }

        TransactionCommands::List {
            quarter,
            kind,
            year,
        } => {
            let quarter = parse_quarter(&quarter)?;
            let kind = parse_type(&kind)?;
            let year = resolve_year(storage, year)?;

            let transactions = service.list(quarter, kind, year)?;
            println!("{} {} {}", quarter, kind, year);
            print!("{}", format_transaction_register(&transactions, currency));
        }

        TransactionCommands::Delete { id } => {
            let txn_id: TransactionId = id.parse().map_err(|_| {
                QuarterbookError::Validation(format!("Invalid transaction ID: '{}'", id))
            })?;

            let txn = service.delete(txn_id)?;
            println!(
                "Deleted transaction {} ({} {} {})",
                txn.id,
                txn.quarter,
                txn.kind,
                txn.amount.format_with_symbol(currency.symbol())
            );
        }
    }

    Ok(())
}
