//! Property-based tests for the Aggregator.
//!
//! - Account net equals income minus expense
//! - Category actual amounts conserve categorized actual spending
//! - Identical input yields identical output, whatever its order
//! - Categorization of an exact `contains` match

use chrono::NaiveDate;
use proptest::prelude::*;

use super::aggregator::Aggregator;
use super::categorizer::{Categorizer, CategorizerOptions};
use crate::models::{
    Account, AccountSubType, AggregationConfig, AnyTransaction, Category, CategoryDirectory,
    CategoryPattern, Money, ProjectedTransaction, Transaction, TransactionType,
};

const ACCOUNTS: [&str; 3] = ["acc_checking", "acc_savings", "acc_card"];
const CATEGORIES: [&str; 3] = ["groceries", "rent", "salary"];

/// Strategy to generate amounts from 0.00 to 10,000.00.
fn amount() -> impl Strategy<Value = Money> {
    (0i64..1_000_000i64).prop_map(Money::from_cents)
}

/// Strategy to generate dates from mid-November 2025 to mid-February 2026.
fn date() -> impl Strategy<Value = NaiveDate> {
    (0i64..90).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2025, 11, 15).unwrap() + chrono::Duration::days(offset)
    })
}

fn kind() -> impl Strategy<Value = TransactionType> {
    prop_oneof![Just(TransactionType::Income), Just(TransactionType::Expense)]
}

/// Strategy to generate one transaction with index-unique id.
fn transaction(index: usize) -> impl Strategy<Value = AnyTransaction> {
    (
        date(),
        amount(),
        kind(),
        0usize..ACCOUNTS.len(),
        proptest::option::of(0usize..CATEGORIES.len()),
        any::<bool>(),
    )
        .prop_map(move |(on, amount, kind, account, category, projected)| {
            let mut txn = Transaction::new(
                format!("txn_{:03}", index),
                on,
                "generated",
                amount,
                kind,
                ACCOUNTS[account],
                "usd",
            );
            txn.category = category.map(|c| CATEGORIES[c].into());
            if projected {
                ProjectedTransaction::new(txn, None).into()
            } else {
                txn.into()
            }
        })
}

fn transactions() -> impl Strategy<Value = Vec<AnyTransaction>> {
    (0usize..40).prop_flat_map(|len| (0..len).map(transaction).collect::<Vec<_>>())
}

fn accounts() -> Vec<Account> {
    vec![
        Account::new(ACCOUNTS[0], "Checking", AccountSubType::CheckingPersonal, "inst", "usd"),
        Account::new(ACCOUNTS[1], "Savings", AccountSubType::SavingsGoal, "inst", "usd"),
        Account::new(ACCOUNTS[2], "Card", AccountSubType::CreditCardPersonal, "inst", "usd"),
    ]
}

fn directory() -> CategoryDirectory {
    let categories = vec![
        Category::new("groceries", "Groceries", TransactionType::Expense),
        Category::new("rent", "Rent", TransactionType::Expense),
        Category::new("salary", "Salary", TransactionType::Income),
    ];
    CategoryDirectory::new(&categories)
}

fn december() -> AggregationConfig {
    AggregationConfig::new(
        NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every account summary satisfies net = income - expense.
    #[test]
    fn prop_net_is_income_minus_expense(txns in transactions()) {
        let dir = directory();
        let report = Aggregator::new(&dir).aggregate(&accounts(), &txns, &december()).unwrap();

        prop_assert_eq!(report.account_summaries.len(), ACCOUNTS.len());
        for summary in &report.account_summaries {
            prop_assert_eq!(summary.net, summary.total_income - summary.total_expense);
        }
    }

    /// Category actual amounts add up to the categorized actual amounts in window.
    #[test]
    fn prop_category_actuals_are_conserved(txns in transactions()) {
        let dir = directory();
        let config = december();
        let report = Aggregator::new(&dir).aggregate(&accounts(), &txns, &config).unwrap();

        let window = config.validate().unwrap();
        let expected: Money = txns
            .iter()
            .filter(|t| !t.is_projected() && t.category().is_some() && window.contains(t.date()))
            .map(|t| t.details().amount)
            .sum();
        prop_assert_eq!(report.categorized_actual_total(), expected);

        let uncategorized: Money = txns
            .iter()
            .filter(|t| !t.is_projected() && t.category().is_none() && window.contains(t.date()))
            .map(|t| t.details().amount)
            .sum();
        prop_assert_eq!(report.uncategorized.actual_amount, uncategorized);
    }

    /// Months add up to the same in-window totals as categories plus uncategorized.
    #[test]
    fn prop_months_match_categories(txns in transactions()) {
        let dir = directory();
        let report = Aggregator::new(&dir).aggregate(&accounts(), &txns, &december()).unwrap();

        let monthly_actual: Money = report
            .monthly_aggregates
            .iter()
            .map(|m| m.actual_income + m.actual_expense)
            .sum();
        prop_assert_eq!(
            monthly_actual,
            report.categorized_actual_total() + report.uncategorized.actual_amount
        );
        prop_assert!(report.monthly_aggregates.len() <= 1);
    }

    /// Shuffled input yields an identical report.
    #[test]
    fn prop_aggregation_is_order_independent(txns in transactions()) {
        let dir = directory();
        let aggregator = Aggregator::new(&dir);
        let mut reversed = txns.clone();
        reversed.reverse();

        let a = aggregator.aggregate(&accounts(), &txns, &december()).unwrap();
        let b = aggregator.aggregate(&accounts(), &reversed, &december()).unwrap();
        let c = aggregator.aggregate(&accounts(), &txns, &december()).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(&a, &c);
    }

    /// A reversed window never produces a report.
    #[test]
    fn prop_reversed_window_is_rejected(txns in transactions(), gap in 1i64..400) {
        let dir = directory();
        let end = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        let start = end + chrono::Duration::days(gap);
        let result = Aggregator::new(&dir).aggregate(
            &accounts(),
            &txns,
            &AggregationConfig::new(start, end),
        );
        prop_assert!(result.map_err(|e| e.is_invalid_window()).err().unwrap_or(false));
    }

    /// An exact `contains` needle anywhere in a description assigns its category.
    #[test]
    fn prop_contains_match_assigns_category(
        prefix in "[a-z ]{0,12}",
        suffix in "[a-z ]{0,12}",
    ) {
        let patterns = vec![CategoryPattern::contains("pat_walmart", "groceries", "walmart")];
        let (categorizer, warnings) =
            Categorizer::new(&patterns, &directory(), &CategorizerOptions::default());
        prop_assert!(warnings.is_empty());

        let description = format!("{}WALMART{}", prefix, suffix);
        let found = categorizer.match_description(&description, TransactionType::Expense);
        prop_assert_eq!(found.map(|m| m.category_id.to_string()), Some("groceries".to_string()));
    }
}
