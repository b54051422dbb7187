//! Transaction display formatting

use crate::config::Currency;
use crate::models::Transaction;

/// One register line: date, description, amount, tax, receipt amount
pub fn format_transaction_row(txn: &Transaction, currency: Currency) -> String {
    let description: &str = if txn.description.is_empty() {
        "(no description)"
    } else {
        &txn.description
    };

    format!(
        "{:>13}  {}  {}  {:>12} {:>6}% {:>12}",
        txn.id,
        txn.date.format("%Y-%m-%d"),
        truncate(description, 24),
        txn.amount.format_with_symbol(currency.symbol()),
        txn.tax.to_string(),
        txn.receipt_amount.format_with_symbol(currency.symbol())
    )
}

/// Register for one quarter/type/year bucket
pub fn format_transaction_register(transactions: &[Transaction], currency: Currency) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:>13}  {:10}  {:24}  {:>12} {:>7} {:>12}\n",
        "ID", "Date", "Description", "Amount", "Tax", "Receipt"
    ));
    output.push_str(&"-".repeat(88));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format_transaction_row(txn, currency));
        output.push('\n');
    }

    output
}

/// Multi-line summary printed after `txn add`
pub fn format_transaction_details(txn: &Transaction, currency: Currency) -> String {
    let symbol = currency.symbol();
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Quarter:     {} {}\n", txn.quarter, txn.year));
    output.push_str(&format!("Type:        {}\n", txn.kind));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!("Amount:      {}\n", txn.amount.format_with_symbol(symbol)));
    output.push_str(&format!("Tax:         {}%\n", txn.tax));
    output.push_str(&format!(
        "Receipt:     {}\n",
        txn.receipt_amount.format_with_symbol(symbol)
    ));
    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }

    output
}

/// Pad or cut to exactly `width` characters
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        format!("{:width$}", s, width = width)
    } else {
        let head: String = s.chars().take(width - 3).collect();
        format!("{}...", head)
    }
}
