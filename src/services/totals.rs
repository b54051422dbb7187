//! Quarter and year totals
//!
//! Sums `amount` per quarter and type for one stored year. The tax-inclusive
//! figures are recomputed from `amount` and `tax`, one rounded cent value per
//! transaction; the stored `receipt_amount` is never read here.

use crate::error::QuarterbookResult;
use crate::models::{Money, Quarter, Transaction, TransactionType};
use crate::storage::Storage;

/// Totals for one quarter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuarterTotals {
    pub quarter: Quarter,
    pub income_total: Money,
    pub expenditure_total: Money,
    pub income_with_tax: Money,
    pub expenditure_with_tax: Money,
}

impl QuarterTotals {
    pub fn empty(quarter: Quarter) -> Self {
        Self {
            quarter,
            income_total: Money::zero(),
            expenditure_total: Money::zero(),
            income_with_tax: Money::zero(),
            expenditure_with_tax: Money::zero(),
        }
    }

    fn add(&mut self, txn: &Transaction) {
        match txn.kind {
            TransactionType::Income => {
                self.income_total += txn.amount;
                self.income_with_tax += txn.tax_inclusive_amount();
            }
            TransactionType::Expenditure => {
                self.expenditure_total += txn.amount;
                self.expenditure_with_tax += txn.tax_inclusive_amount();
            }
        }
    }

    /// Income minus expenditure; may be negative
    pub fn balance(&self) -> Money {
        self.income_total - self.expenditure_total
    }

    pub fn balance_with_tax(&self) -> Money {
        self.income_with_tax - self.expenditure_with_tax
    }
}

/// The four quarters of a year plus their sums
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearTotals {
    pub year: i32,
    pub quarters: [QuarterTotals; 4],
    pub income_total: Money,
    pub expenditure_total: Money,
    pub income_with_tax: Money,
    pub expenditure_with_tax: Money,
}

impl YearTotals {
    pub fn from_quarters(year: i32, quarters: [QuarterTotals; 4]) -> Self {
        Self {
            year,
            income_total: quarters.iter().map(|q| q.income_total).sum(),
            expenditure_total: quarters.iter().map(|q| q.expenditure_total).sum(),
            income_with_tax: quarters.iter().map(|q| q.income_with_tax).sum(),
            expenditure_with_tax: quarters.iter().map(|q| q.expenditure_with_tax).sum(),
            quarters,
        }
    }

    pub fn balance(&self) -> Money {
        self.income_total - self.expenditure_total
    }

    pub fn balance_with_tax(&self) -> Money {
        self.income_with_tax - self.expenditure_with_tax
    }

    pub fn quarter(&self, quarter: Quarter) -> &QuarterTotals {
        &self.quarters[quarter.index()]
    }
}

/// Per-quarter totals of the transactions whose stored year is `year`.
/// All four buckets are always present.
pub fn compute_totals<'t>(
    transactions: impl IntoIterator<Item = &'t Transaction>,
    year: i32,
) -> [QuarterTotals; 4] {
    let mut buckets = Quarter::ALL.map(QuarterTotals::empty);
    for txn in transactions.into_iter().filter(|t| t.year == year) {
        buckets[txn.quarter.index()].add(txn);
    }
    buckets
}

pub struct TotalsService<'a> {
    storage: &'a Storage,
}

impl<'a> TotalsService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn get_totals(&self, year: i32) -> QuarterbookResult<[QuarterTotals; 4]> {
        let transactions = self.storage.transactions.get_by_year(year)?;
        Ok(compute_totals(&transactions, year))
    }

    pub fn year_totals(&self, year: i32) -> QuarterbookResult<YearTotals> {
        Ok(YearTotals::from_quarters(year, self.get_totals(year)?))
    }
}
