//! Totals table formatting

use crate::config::Currency;
use crate::models::Money;
use crate::services::YearTotals;

/// Quarter rows plus a year row. With `with_tax` the tax-inclusive figures
/// are shown instead of the plain amounts.
pub fn format_totals(totals: &YearTotals, currency: Currency, with_tax: bool) -> String {
    let symbol = currency.symbol();
    let money = |m: Money| m.format_with_symbol(symbol);

    let mut output = String::new();
    let title = if with_tax {
        format!("Totals {} (including tax)", totals.year)
    } else {
        format!("Totals {}", totals.year)
    };
    output.push_str(&title);
    output.push('\n');
    output.push_str(&format!(
        "{:8} {:>14} {:>14} {:>14}\n",
        "Quarter", "Income", "Expenditure", "Balance"
    ));
    output.push_str(&"-".repeat(53));
    output.push('\n');

    for q in &totals.quarters {
        let (income, expenditure, balance) = if with_tax {
            (q.income_with_tax, q.expenditure_with_tax, q.balance_with_tax())
        } else {
            (q.income_total, q.expenditure_total, q.balance())
        };
        output.push_str(&format!(
            "{:8} {:>14} {:>14} {:>14}\n",
            q.quarter.to_string(),
            money(income),
            money(expenditure),
            money(balance)
        ));
    }

    let (income, expenditure, balance) = if with_tax {
        (
            totals.income_with_tax,
            totals.expenditure_with_tax,
            totals.balance_with_tax(),
        )
    } else {
        (totals.income_total, totals.expenditure_total, totals.balance())
    };
    output.push_str(&"-".repeat(53));
    output.push('\n');
    output.push_str(&format!(
        "{:8} {:>14} {:>14} {:>14}\n",
        "Year",
        money(income),
        money(expenditure),
        money(balance)
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Quarter;
    use crate::services::QuarterTotals;

    fn year() -> YearTotals {
        let mut quarters = Quarter::ALL.map(QuarterTotals::empty);
        quarters[0].income_total = Money::from_cents(10000);
        quarters[0].income_with_tax = Money::from_cents(11000);
        quarters[1].expenditure_total = Money::from_cents(8000);
        quarters[1].expenditure_with_tax = Money::from_cents(8000);
        YearTotals::from_quarters(2024, quarters)
    }

    #[test]
    fn test_all_quarters_listed() {
        let out = format_totals(&year(), Currency::Usd, false);
        for q in ["Q1", "Q2", "Q3", "Q4", "Year"] {
            assert!(out.contains(q), "missing {q}");
        }
        assert!(out.contains("$100.00"));
        assert!(out.contains("-$80.00"));
        assert!(out.contains("$20.00"));
    }

    #[test]
    fn test_with_tax() {
        let out = format_totals(&year(), Currency::Inr, true);
        assert!(out.starts_with("Totals 2024 (including tax)"));
        assert!(out.contains("₹110.00"));
        assert!(out.contains("₹30.00"));
    }
}
