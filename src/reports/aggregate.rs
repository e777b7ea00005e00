//! The combined aggregation result

use serde::Serialize;

use crate::display::report::{double_separator, format_header};
use crate::error::EngineWarning;
use crate::models::{DateWindow, Money};

use super::account_summary::{format_account_summaries, AccountSummary};
use super::category::{format_category_aggregates, CategoryAggregate};
use super::monthly::{format_monthly_aggregates, MonthlyAggregate};

/// In-window transactions that carry no category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UncategorizedTotals {
    pub actual_amount: Money,
    pub projected_amount: Money,
    pub transaction_count: usize,
}

impl UncategorizedTotals {
    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }
}

/// Everything one aggregation call produces
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReport {
    pub window: DateWindow,
    pub account_summaries: Vec<AccountSummary>,
    /// Ordered by category id
    pub category_aggregates: Vec<CategoryAggregate>,
    /// Ascending by month
    pub monthly_aggregates: Vec<MonthlyAggregate>,
    pub uncategorized: UncategorizedTotals,
    pub warnings: Vec<EngineWarning>,
}

impl AggregateReport {
    /// Sum of actual amounts across all categories
    pub fn categorized_actual_total(&self) -> Money {
        self.category_aggregates.iter().map(|a| a.actual_amount).sum()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format_header(
            &format!("Financial Summary: {}", self.window),
            86,
        ));
        output.push('\n');
        output.push_str(&double_separator(86));
        output.push_str("\n\n");

        output.push_str(&format_account_summaries(&self.account_summaries, symbol));
        output.push('\n');
        output.push_str(&format_category_aggregates(&self.category_aggregates, symbol));

        if !self.uncategorized.is_empty() {
            output.push_str(&format!(
                "{:<35} {:>12} {:>12}  ({} transactions)\n",
                "UNCATEGORIZED",
                self.uncategorized.actual_amount.format_with_symbol(symbol),
                self.uncategorized.projected_amount.format_with_symbol(symbol),
                self.uncategorized.transaction_count
            ));
        }

        output.push('\n');
        output.push_str(&format_monthly_aggregates(&self.monthly_aggregates, symbol));

        if !self.warnings.is_empty() {
            output.push_str(&format!("\nWarnings ({})\n", self.warnings.len()));
            for warning in &self.warnings {
                output.push_str(&format!("  - {}\n", warning));
            }
        }

        output
    }
}
