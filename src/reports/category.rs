//! Per-category aggregates and parent rollups

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::display::report::{format_bar, format_percentage, separator, truncate};
use crate::error::EngineWarning;
use crate::models::{CategoryDirectory, CategoryId, Money, TransactionType};

/// Totals for one category over a window
///
/// Actual and projected amounts are kept apart. `percentage` is this
/// category's share of the actual amount across all categories, as a ratio.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAggregate {
    #[serde(rename = "category")]
    pub category_id: CategoryId,
    /// None when the id is not in the category directory
    pub category_name: Option<String>,
    pub category_type: Option<TransactionType>,
    pub actual_amount: Money,
    pub projected_amount: Money,
    pub percentage: f64,
    pub transaction_count: usize,
}

impl CategoryAggregate {
    /// An empty aggregate labelled from the directory
    pub fn empty(category_id: CategoryId, categories: &CategoryDirectory) -> Self {
        let category = categories.get(&category_id);
        Self {
            category_name: category.map(|c| c.name.clone()),
            category_type: category.map(|c| c.kind),
            category_id,
            actual_amount: Money::zero(),
            projected_amount: Money::zero(),
            percentage: 0.0,
            transaction_count: 0,
        }
    }

    /// Name for display, falling back to the id
    pub fn label(&self) -> &str {
        self.category_name
            .as_deref()
            .unwrap_or_else(|| self.category_id.as_str())
    }

    fn absorb(&mut self, other: &CategoryAggregate) {
        self.actual_amount += other.actual_amount;
        self.projected_amount += other.projected_amount;
        self.transaction_count += other.transaction_count;
    }
}

/// Set every `percentage` from the actual amounts, 0 when they sum to zero
pub fn assign_percentages(aggregates: &mut [CategoryAggregate]) {
    let total: Money = aggregates.iter().map(|a| a.actual_amount).sum();
    for aggregate in aggregates {
        aggregate.percentage = aggregate.actual_amount.ratio_of(total);
    }
}

/// Fold each aggregate into all of its ancestors
///
/// Every category touched (directly or as an ancestor) gets one rolled-up
/// aggregate holding its own totals plus those of its descendants.
/// Percentages stay relative to the un-rolled actual total, so a parent's
/// share equals the sum of its subtree's shares. A parent cycle yields one
/// `CategoryCycle` warning per category it was found from.
pub fn rollup_to_parents(
    aggregates: &[CategoryAggregate],
    categories: &CategoryDirectory,
) -> (Vec<CategoryAggregate>, Vec<EngineWarning>) {
    let mut rolled: BTreeMap<CategoryId, CategoryAggregate> = BTreeMap::new();
    let mut cyclic: BTreeSet<CategoryId> = BTreeSet::new();

    for aggregate in aggregates {
        rolled
            .entry(aggregate.category_id.clone())
            .or_insert_with(|| CategoryAggregate::empty(aggregate.category_id.clone(), categories))
            .absorb(aggregate);

        let (ancestors, cycle) = categories.ancestors(&aggregate.category_id);
        if cycle {
            cyclic.insert(aggregate.category_id.clone());
        }
        for ancestor in ancestors {
            rolled
                .entry(ancestor.clone())
                .or_insert_with(|| CategoryAggregate::empty(ancestor, categories))
                .absorb(aggregate);
        }
    }

    let total: Money = aggregates.iter().map(|a| a.actual_amount).sum();
    let rolled: Vec<CategoryAggregate> = rolled
        .into_values()
        .map(|mut aggregate| {
            aggregate.percentage = aggregate.actual_amount.ratio_of(total);
            aggregate
        })
        .collect();

    let warnings = cyclic
        .into_iter()
        .map(|category_id| {
            let warning = EngineWarning::CategoryCycle { category_id };
            warning.emit();
            warning
        })
        .collect();

    (rolled, warnings)
}

/// The `limit` categories with the largest actual amount
pub fn top_categories(aggregates: &[CategoryAggregate], limit: usize) -> Vec<&CategoryAggregate> {
    let mut sorted: Vec<&CategoryAggregate> = aggregates.iter().collect();
    sorted.sort_by(|a, b| {
        b.actual_amount
            .cmp(&a.actual_amount)
            .then_with(|| a.category_id.cmp(&b.category_id))
    });
    sorted.truncate(limit);
    sorted
}

/// Format category aggregates as a terminal table
pub fn format_category_aggregates(aggregates: &[CategoryAggregate], symbol: &str) -> String {
    let mut output = String::new();

    output.push_str("Categories\n");
    output.push_str(&separator(86));
    output.push('\n');

    if aggregates.is_empty() {
        output.push_str("No categorized transactions in window.\n");
        return output;
    }

    output.push_str(&format!(
        "{:<26} {:<8} {:>12} {:>12} {:>7}  {}\n",
        "Category", "Type", "Actual", "Projected", "Share", ""
    ));

    let max_share = aggregates
        .iter()
        .map(|a| a.percentage)
        .fold(0.0_f64, f64::max);

    for aggregate in aggregates {
        let kind = aggregate
            .category_type
            .map(|k| k.to_string())
            .unwrap_or_else(|| "?".to_string());
        output.push_str(&format!(
            "{:<26} {:<8} {:>12} {:>12} {:>7}  {}\n",
            truncate(aggregate.label(), 26),
            kind,
            aggregate.actual_amount.format_with_symbol(symbol),
            aggregate.projected_amount.format_with_symbol(symbol),
            format_percentage(aggregate.percentage * 100.0),
            format_bar(aggregate.percentage, max_share, 12),
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn directory() -> CategoryDirectory {
        let categories = vec![
            Category::new("cat_living", "Living Expenses", TransactionType::Expense),
            Category::new("cat_groceries", "Groceries", TransactionType::Expense)
                .with_parent("cat_living"),
            Category::new("cat_rent", "Rent", TransactionType::Expense).with_parent("cat_living"),
            Category::new("cat_a", "A", TransactionType::Expense).with_parent("cat_b"),
            Category::new("cat_b", "B", TransactionType::Expense).with_parent("cat_a"),
        ];
        CategoryDirectory::new(&categories)
    }

    fn aggregate(id: &str, actual: i64, projected: i64) -> CategoryAggregate {
        let mut aggregate = CategoryAggregate::empty(CategoryId::new(id), &directory());
        aggregate.actual_amount = Money::from_cents(actual);
        aggregate.projected_amount = Money::from_cents(projected);
        aggregate.transaction_count = 1;
        aggregate
    }

    #[test]
    fn test_assign_percentages() {
        let mut aggregates = vec![aggregate("cat_groceries", 2500, 0), aggregate("cat_rent", 7500, 0)];
        assign_percentages(&mut aggregates);
        assert_eq!(aggregates[0].percentage, 0.25);
        assert_eq!(aggregates[1].percentage, 0.75);
    }

    #[test]
    fn test_percentages_zero_when_no_actuals() {
        let mut aggregates = vec![aggregate("cat_groceries", 0, 1000)];
        assign_percentages(&mut aggregates);
        assert_eq!(aggregates[0].percentage, 0.0);
    }

    #[test]
    fn test_rollup_folds_into_parents() {
        let aggregates = vec![aggregate("cat_groceries", 2500, 100), aggregate("cat_rent", 7500, 0)];
        let (rolled, warnings) = rollup_to_parents(&aggregates, &directory());
        assert!(warnings.is_empty());
        assert_eq!(rolled.len(), 3);

        let living = rolled
            .iter()
            .find(|a| a.category_id.as_str() == "cat_living")
            .unwrap();
        assert_eq!(living.actual_amount, Money::from_cents(10000));
        assert_eq!(living.projected_amount, Money::from_cents(100));
        assert_eq!(living.transaction_count, 2);
        assert_eq!(living.percentage, 1.0);
        assert_eq!(living.label(), "Living Expenses");
    }

    #[test]
    fn test_rollup_reports_cycles() {
        let aggregates = vec![aggregate("cat_a", 100, 0)];
        let (rolled, warnings) = rollup_to_parents(&aggregates, &directory());
        assert_eq!(rolled.len(), 2);
        assert_eq!(
            warnings,
            vec![EngineWarning::CategoryCycle {
                category_id: CategoryId::new("cat_a")
            }]
        );
    }

    #[test]
    fn test_wire_format() {
        let mut groceries = aggregate("cat_groceries", 2500, 100);
        groceries.percentage = 0.25;
        let value = serde_json::to_value(&groceries).unwrap();

        assert_eq!(value["category"], "cat_groceries");
        assert!(value.get("categoryId").is_none());
        assert_eq!(value["categoryName"], "Groceries");
        assert_eq!(value["categoryType"], "expense");
        assert_eq!(value["actualAmount"], 25.0);
        assert_eq!(value["projectedAmount"], 1.0);
        assert_eq!(value["percentage"], 0.25);
        assert_eq!(value["transactionCount"], 1);
    }

    #[test]
    fn test_top_categories() {
        let aggregates = vec![
            aggregate("cat_groceries", 2500, 0),
            aggregate("cat_rent", 7500, 0),
            aggregate("cat_a", 100, 0),
        ];
        let top = top_categories(&aggregates, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].category_id.as_str(), "cat_rent");
    }

    #[test]
    fn test_unknown_category_label_falls_back_to_id() {
        let aggregate = CategoryAggregate::empty(CategoryId::new("cat_unlisted"), &directory());
        assert_eq!(aggregate.label(), "cat_unlisted");
        assert!(aggregate.category_type.is_none());
    }
}
