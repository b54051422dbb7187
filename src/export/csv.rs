//! CSV export
//!
//! Every field is quoted and rows end in `\n`. Amounts and tax are written
//! as plain numbers (`100`, `100.5`) like the stored JSON.

use std::io::Write;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::{QuarterbookError, QuarterbookResult};
use crate::models::Transaction;

use super::COLUMNS;

/// Cell values of one export row, in [`COLUMNS`] order
pub(crate) fn row_values(txn: &Transaction) -> [String; 9] {
    [
        txn.id.to_string(),
        txn.quarter.number().to_string(),
        txn.kind.to_string(),
        txn.amount.as_f64().to_string(),
        txn.tax.as_f64().to_string(),
        txn.receipt_amount.as_f64().to_string(),
        txn.description.clone(),
        txn.date.format("%Y-%m-%d").to_string(),
        txn.year.to_string(),
    ]
}

/// Write the header and one row per transaction
pub fn write_transactions_csv<W: Write>(
    transactions: &[Transaction],
    writer: W,
) -> QuarterbookResult<()> {
    let mut csv_writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer
        .write_record(COLUMNS)
        .map_err(|e| QuarterbookError::Export(e.to_string()))?;

    for txn in transactions {
        csv_writer
            .write_record(row_values(txn))
            .map_err(|e| QuarterbookError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| QuarterbookError::Export(e.to_string()))?;
    Ok(())
}

/// CSV document as bytes
pub fn transactions_to_csv(transactions: &[Transaction]) -> QuarterbookResult<Vec<u8>> {
    let mut buffer = Vec::new();
    write_transactions_csv(transactions, &mut buffer)?;
    Ok(buffer)
}
