//! XLSX export
//!
//! One worksheet named `Transactions`: a bold header row, numeric cells for
//! id, quarter, amounts, tax and year, text cells for the rest.

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::error::{QuarterbookError, QuarterbookResult};
use crate::models::Transaction;

use super::COLUMNS;

pub const SHEET_NAME: &str = "Transactions";

fn export_error(e: XlsxError) -> QuarterbookError {
    QuarterbookError::Export(format!("Failed to build workbook: {}", e))
}

/// Workbook bytes for the given transactions
pub fn transactions_to_xlsx(transactions: &[Transaction]) -> QuarterbookResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME).map_err(export_error)?;

    for (col, title) in COLUMNS.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *title, &header)
            .map_err(export_error)?;
    }

    for (i, txn) in transactions.iter().enumerate() {
        let row = i as u32 + 1;
        sheet
            .write_number(row, 0, txn.id.value() as f64)
            .map_err(export_error)?;
        sheet
            .write_number(row, 1, f64::from(txn.quarter.number()))
            .map_err(export_error)?;
        sheet
            .write_string(row, 2, txn.kind.as_str())
            .map_err(export_error)?;
        sheet
            .write_number(row, 3, txn.amount.as_f64())
            .map_err(export_error)?;
        sheet
            .write_number(row, 4, txn.tax.as_f64())
            .map_err(export_error)?;
        sheet
            .write_number(row, 5, txn.receipt_amount.as_f64())
            .map_err(export_error)?;
        sheet
            .write_string(row, 6, txn.description.as_str())
            .map_err(export_error)?;
        sheet
            .write_string(row, 7, txn.date.format("%Y-%m-%d").to_string())
            .map_err(export_error)?;
        sheet
            .write_number(row, 8, f64::from(txn.year))
            .map_err(export_error)?;
    }

    workbook.save_to_buffer().map_err(export_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, NewTransaction, Quarter, TransactionId, TransactionType};
    use calamine::{Data, Reader, Xlsx};
    use chrono::NaiveDate;
    use std::io::Cursor;

    #[test]
    fn test_workbook_layout() {
        let txn = Transaction::from_new(
            TransactionId::new(42),
            NewTransaction::new(
                Quarter::Q3,
                TransactionType::Expenditure,
                Money::from_cents(1999),
                NaiveDate::from_ymd_opt(2024, 8, 9).unwrap(),
            )
            .with_description("Printer ink"),
        );

        let bytes = transactions_to_xlsx(&[txn]).unwrap();
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);

        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        let rows: Vec<_> = range.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][5], Data::String("Receipt Amount".to_string()));
        assert_eq!(rows[1][2], Data::String("expenditure".to_string()));
        assert_eq!(rows[1][3], Data::Float(19.99));
        assert_eq!(rows[1][7], Data::String("2024-08-09".to_string()));
    }
}
