//! Calendar-month rollups

use serde::Serialize;

use crate::display::report::separator;
use crate::models::{Money, Month, TransactionType};

/// Income and expense of one calendar month, actual and projected apart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAggregate {
    pub month: Month,
    pub actual_income: Money,
    pub projected_income: Money,
    pub actual_expense: Money,
    pub projected_expense: Money,
}

impl MonthlyAggregate {
    pub fn new(month: Month) -> Self {
        Self {
            month,
            actual_income: Money::zero(),
            projected_income: Money::zero(),
            actual_expense: Money::zero(),
            projected_expense: Money::zero(),
        }
    }

    /// Add one transaction's amount to the matching bucket
    pub fn record(&mut self, kind: TransactionType, projected: bool, amount: Money) {
        let bucket = match (kind, projected) {
            (TransactionType::Income, false) => &mut self.actual_income,
            (TransactionType::Income, true) => &mut self.projected_income,
            (TransactionType::Expense, false) => &mut self.actual_expense,
            (TransactionType::Expense, true) => &mut self.projected_expense,
        };
        *bucket += amount;
    }

    pub fn actual_net(&self) -> Money {
        self.actual_income - self.actual_expense
    }

    pub fn projected_net(&self) -> Money {
        self.projected_income - self.projected_expense
    }
}

/// Format monthly aggregates as a terminal table
pub fn format_monthly_aggregates(months: &[MonthlyAggregate], symbol: &str) -> String {
    let mut output = String::new();

    output.push_str("Months\n");
    output.push_str(&separator(101));
    output.push('\n');

    if months.is_empty() {
        output.push_str("No transactions in window.\n");
        return output;
    }

    output.push_str(&format!(
        "{:<9} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14}\n",
        "Month", "Income", "Expense", "Net", "Proj. Income", "Proj. Expense", "Proj. Net"
    ));

    for month in months {
        output.push_str(&format!(
            "{:<9} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14}\n",
            month.month.to_string(),
            month.actual_income.format_with_symbol(symbol),
            month.actual_expense.format_with_symbol(symbol),
            month.actual_net().format_with_symbol(symbol),
            month.projected_income.format_with_symbol(symbol),
            month.projected_expense.format_with_symbol(symbol),
            month.projected_net().format_with_symbol(symbol),
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_buckets_apart() {
        let mut month = MonthlyAggregate::new(Month::new(2025, 12).unwrap());
        month.record(TransactionType::Expense, false, Money::from_cents(5000));
        month.record(TransactionType::Income, false, Money::from_cents(300000));
        month.record(TransactionType::Expense, true, Money::from_cents(150000));

        assert_eq!(month.actual_income, Money::from_cents(300000));
        assert_eq!(month.actual_expense, Money::from_cents(5000));
        assert_eq!(month.projected_income, Money::zero());
        assert_eq!(month.projected_expense, Money::from_cents(150000));
        assert_eq!(month.actual_net(), Money::from_cents(295000));
        assert_eq!(month.projected_net(), Money::from_cents(-150000));
    }

    #[test]
    fn test_format_shows_projected_net() {
        let mut month = MonthlyAggregate::new(Month::new(2025, 12).unwrap());
        month.record(TransactionType::Income, true, Money::from_cents(300000));
        month.record(TransactionType::Expense, true, Money::from_cents(150000));

        let output = format_monthly_aggregates(&[month], "$");
        assert!(output.contains("Proj. Net"));
        let row = output.lines().find(|l| l.starts_with("2025-12")).unwrap();
        assert!(row.trim_end().ends_with("$1500.00"));
    }

    #[test]
    fn test_format_empty() {
        let output = format_monthly_aggregates(&[], "$");
        assert!(output.contains("No transactions in window."));
    }

    #[test]
    fn test_serialized_shape() {
        let mut month = MonthlyAggregate::new(Month::new(2025, 12).unwrap());
        month.record(TransactionType::Income, false, Money::from_cents(300000));
        let json = serde_json::to_value(&month).unwrap();
        assert_eq!(json["month"], "2025-12");
        assert_eq!(json["actualIncome"], 3000.0);
        assert_eq!(json["projectedExpense"], 0.0);
    }
}
