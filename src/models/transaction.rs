//! Transaction model
//!
//! An income or expenditure line booked against a fiscal quarter. Records are
//! immutable once created; `quarter` and `year` are frozen at creation and
//! never recomputed from `date`.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::TransactionId;
use super::money::Money;
use super::quarter::Quarter;
use super::tax::TaxRate;

/// Whether a transaction is money in or money out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expenditure,
}

impl TransactionType {
    pub const ALL: [TransactionType; 2] = [TransactionType::Income, TransactionType::Expenditure];

    /// Parse the stored form (`income` / `expenditure`), exact match
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "income" => Some(Self::Income),
            "expenditure" => Some(Self::Expenditure),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expenditure => "expenditure",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything needed to create a transaction except its id
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub quarter: Quarter,
    pub kind: TransactionType,
    pub amount: Money,
    pub tax: TaxRate,
    pub receipt_amount: Money,
    pub description: String,
    pub date: NaiveDate,
    /// Defaults to the calendar year of `date`
    pub year: Option<i32>,
}

impl NewTransaction {
    /// Input with zero tax and the receipt amount equal to `amount`
    pub fn new(quarter: Quarter, kind: TransactionType, amount: Money, date: NaiveDate) -> Self {
        Self {
            quarter,
            kind,
            amount,
            tax: TaxRate::zero(),
            receipt_amount: amount,
            description: String::new(),
            date,
            year: None,
        }
    }

    /// Set the tax rate and recompute the receipt amount from it
    pub fn with_tax(mut self, tax: TaxRate) -> Self {
        self.tax = tax;
        self.receipt_amount = self.amount.with_tax(tax);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }
}

/// A stored transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TransactionRecord")]
pub struct Transaction {
    pub id: TransactionId,
    pub quarter: Quarter,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Money,
    pub tax: TaxRate,
    /// Tax-inclusive amount captured at entry; display only
    pub receipt_amount: Money,
    pub description: String,
    pub date: NaiveDate,
    pub year: i32,
}

/// On-disk shape; older records may lack `year` or the tax fields
#[derive(Deserialize)]
struct TransactionRecord {
    id: TransactionId,
    quarter: Quarter,
    #[serde(rename = "type")]
    kind: TransactionType,
    amount: Money,
    #[serde(default)]
    tax: TaxRate,
    #[serde(default)]
    receipt_amount: Option<Money>,
    #[serde(default)]
    description: String,
    date: NaiveDate,
    #[serde(default)]
    year: Option<i32>,
}

impl From<TransactionRecord> for Transaction {
    fn from(r: TransactionRecord) -> Self {
        Self {
            id: r.id,
            quarter: r.quarter,
            kind: r.kind,
            amount: r.amount,
            tax: r.tax,
            receipt_amount: r.receipt_amount.unwrap_or(r.amount),
            description: r.description,
            date: r.date,
            year: r.year.unwrap_or_else(|| r.date.year()),
        }
    }
}

impl Transaction {
    /// Build a transaction from creation input, freezing the year
    pub fn from_new(id: TransactionId, input: NewTransaction) -> Self {
        let year = input.year.unwrap_or_else(|| input.date.year());
        Self {
            id,
            quarter: input.quarter,
            kind: input.kind,
            amount: input.amount,
            tax: input.tax,
            receipt_amount: input.receipt_amount,
            description: input.description,
            date: input.date,
            year,
        }
    }

    /// `amount + amount * tax / 100`, recomputed rather than read from
    /// `receipt_amount`
    pub fn tax_inclusive_amount(&self) -> Money {
        self.amount.with_tax(self.tax)
    }

    /// True when quarter, type and year all match
    pub fn matches(&self, quarter: Quarter, kind: TransactionType, year: i32) -> bool {
        self.quarter == quarter && self.kind == kind && self.year == year
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.kind,
            self.amount,
            self.description
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_year_derived_from_date() {
        let input = NewTransaction::new(
            Quarter::Q1,
            TransactionType::Income,
            Money::from_cents(10000),
            date(2024, 2, 1),
        );
        let txn = Transaction::from_new(TransactionId::new(1), input);
        assert_eq!(txn.year, 2024);
    }

    #[test]
    fn test_explicit_year_wins() {
        let input = NewTransaction::new(
            Quarter::Q4,
            TransactionType::Expenditure,
            Money::from_cents(500),
            date(2025, 1, 10),
        )
        .with_year(2024);
        let txn = Transaction::from_new(TransactionId::new(1), input);
        assert_eq!(txn.year, 2024);
        assert!(txn.matches(Quarter::Q4, TransactionType::Expenditure, 2024));
        assert!(!txn.matches(Quarter::Q4, TransactionType::Expenditure, 2025));
    }

    #[test]
    fn test_tax_inclusive_ignores_receipt_amount() {
        let mut txn = Transaction::from_new(
            TransactionId::new(1),
            NewTransaction::new(
                Quarter::Q1,
                TransactionType::Income,
                Money::from_cents(10000),
                date(2024, 2, 1),
            )
            .with_tax(TaxRate::from_percent(10)),
        );
        assert_eq!(txn.receipt_amount.cents(), 11000);

        txn.receipt_amount = Money::from_cents(1);
        assert_eq!(txn.tax_inclusive_amount().cents(), 11000);
    }

    #[test]
    fn test_json_shape() {
        let txn = Transaction::from_new(
            TransactionId::new(1718000000000),
            NewTransaction::new(
                Quarter::Q2,
                TransactionType::Expenditure,
                Money::from_cents(5050),
                date(2024, 5, 3),
            )
            .with_description("Printer paper"),
        );
        let value = serde_json::to_value(&txn).unwrap();
        assert_eq!(value["id"], 1718000000000i64);
        assert_eq!(value["quarter"], 2);
        assert_eq!(value["type"], "expenditure");
        assert_eq!(value["amount"], 50.5);
        assert_eq!(value["date"], "2024-05-03");
        assert_eq!(value["year"], 2024);
        assert!(value.get("receipt_amount").is_some());
    }

    #[test]
    fn test_legacy_record_without_year() {
        let json = r#"{"id":1,"quarter":3,"type":"income","amount":20,"date":"2023-08-14"}"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.year, 2023);
        assert_eq!(txn.tax, TaxRate::zero());
        assert_eq!(txn.receipt_amount, Money::from_cents(2000));
        assert_eq!(txn.description, "");
    }

    #[test]
    fn test_type_parse_is_exact() {
        assert_eq!(TransactionType::parse("income"), Some(TransactionType::Income));
        assert_eq!(TransactionType::parse("Income"), None);
        assert_eq!(TransactionType::Expenditure.to_string(), "expenditure");
    }
}
