//! Aggregation of categorized transactions
//!
//! Transactions are accumulated in (date, id, actual-before-projected)
//! order, so the same input always yields the same report regardless of
//! how it was ordered on the way in.

use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::error::{EngineWarning, FintrackResult};
use crate::models::{
    Account, AccountId, AggregationConfig, AnyTransaction, CategoryDirectory, CategoryId,
    DateWindow, Money, Month,
};
use crate::reports::{
    assign_percentages, AccountSummary, AggregateReport, CategoryAggregate, MonthlyAggregate,
    UncategorizedTotals,
};

/// Running totals for one account
#[derive(Debug, Default)]
struct AccountTotals {
    /// Actual effects up to the window end
    running: Money,
    income: Money,
    expense: Money,
    count: usize,
}

/// Produces aggregate reports against a category directory
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    categories: &'a CategoryDirectory,
}

impl<'a> Aggregator<'a> {
    pub fn new(categories: &'a CategoryDirectory) -> Self {
        Self { categories }
    }

    /// Aggregate `transactions` over the configured window
    ///
    /// Fails only on call-level problems (reversed window, empty scope), in
    /// which case nothing is produced. Per-transaction problems end up in
    /// the report's warnings.
    pub fn aggregate(
        &self,
        accounts: &[Account],
        transactions: &[AnyTransaction],
        config: &AggregationConfig,
    ) -> FintrackResult<AggregateReport> {
        let window = config.validate()?;

        let mut ordered: Vec<&AnyTransaction> = transactions
            .iter()
            .filter(|txn| config.includes_account(&txn.details().account_id))
            .collect();
        ordered.sort_by(|a, b| a.ordering_key().cmp(&b.ordering_key()));

        let account_summaries = self.summarize_accounts(accounts, &ordered, &window, config);

        let mut categories: BTreeMap<CategoryId, CategoryAggregate> = BTreeMap::new();
        let mut months: BTreeMap<Month, MonthlyAggregate> = BTreeMap::new();
        let mut uncategorized = UncategorizedTotals::default();
        let mut warnings = Vec::new();

        for txn in ordered.iter().filter(|txn| window.contains(txn.date())) {
            let details = txn.details();
            if !config.includes_category(details.category.as_ref()) {
                continue;
            }

            if let Some(warning) = self.check_category_type(txn) {
                warning.emit();
                warnings.push(warning);
            }

            // exhaustive on purpose: a new variant must decide its bucket
            let projected = match txn {
                AnyTransaction::Actual(_) => false,
                AnyTransaction::Projected(_) => true,
            };

            match &details.category {
                Some(category_id) => {
                    let aggregate = categories
                        .entry(category_id.clone())
                        .or_insert_with(|| {
                            CategoryAggregate::empty(category_id.clone(), self.categories)
                        });
                    if projected {
                        aggregate.projected_amount += details.amount;
                    } else {
                        aggregate.actual_amount += details.amount;
                    }
                    aggregate.transaction_count += 1;
                }
                None => {
                    if projected {
                        uncategorized.projected_amount += details.amount;
                    } else {
                        uncategorized.actual_amount += details.amount;
                    }
                    uncategorized.transaction_count += 1;
                }
            }

            let month = Month::of(details.date);
            months
                .entry(month)
                .or_insert_with(|| MonthlyAggregate::new(month))
                .record(details.kind, projected, details.amount);
        }

        let mut category_aggregates: Vec<CategoryAggregate> = categories.into_values().collect();
        assign_percentages(&mut category_aggregates);
        let monthly_aggregates: Vec<MonthlyAggregate> = months.into_values().collect();

        debug!(
            window = %window,
            accounts = account_summaries.len(),
            categories = category_aggregates.len(),
            months = monthly_aggregates.len(),
            warnings = warnings.len(),
            "aggregated transactions"
        );

        Ok(AggregateReport {
            window,
            account_summaries,
            category_aggregates,
            monthly_aggregates,
            uncategorized,
            warnings,
        })
    }

    /// One summary per account in scope, in input order
    fn summarize_accounts(
        &self,
        accounts: &[Account],
        ordered: &[&AnyTransaction],
        window: &DateWindow,
        config: &AggregationConfig,
    ) -> Vec<AccountSummary> {
        let mut totals: HashMap<&AccountId, AccountTotals> = HashMap::new();

        for txn in ordered {
            let txn = match txn {
                AnyTransaction::Actual(txn) => txn,
                AnyTransaction::Projected(_) => continue,
            };
            if txn.date > window.end() {
                continue;
            }

            let entry = totals.entry(&txn.account_id).or_default();
            entry.running += txn.signed_amount();
            if window.contains(txn.date) {
                if txn.is_income() {
                    entry.income += txn.amount;
                } else {
                    entry.expense += txn.amount;
                }
                entry.count += 1;
            }
        }

        accounts
            .iter()
            .filter(|account| config.includes_account(&account.id))
            .map(|account| match totals.get(&account.id) {
                Some(t) => AccountSummary::new(account, t.running, t.income, t.expense, t.count),
                None => AccountSummary::new(
                    account,
                    Money::zero(),
                    Money::zero(),
                    Money::zero(),
                    0,
                ),
            })
            .collect()
    }

    fn check_category_type(&self, txn: &AnyTransaction) -> Option<EngineWarning> {
        let details = txn.details();
        let category_id = details.category.as_ref()?;
        let category_type = self.categories.kind_of(category_id)?;
        (category_type != details.kind).then(|| EngineWarning::InconsistentCategoryType {
            transaction_id: details.id.to_string(),
            category_id: category_id.clone(),
            transaction_type: details.kind,
            category_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AccountSubType, Category, Frequency, ProjectedTransaction, Transaction, TransactionType,
    };
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn directory() -> CategoryDirectory {
        let categories = vec![
            Category::new("groceries", "Groceries", TransactionType::Expense),
            Category::new("rent", "Rent", TransactionType::Expense),
            Category::new("salary", "Salary", TransactionType::Income),
        ];
        CategoryDirectory::new(&categories)
    }

    fn checking() -> Account {
        Account::new(
            "acc_checking_001",
            "Main Checking",
            AccountSubType::CheckingPersonal,
            "inst_chase",
            "usd",
        )
    }

    fn txn(
        id: &str,
        on: NaiveDate,
        cents: i64,
        kind: TransactionType,
        category: Option<&str>,
    ) -> Transaction {
        let txn = Transaction::new(
            id,
            on,
            id,
            Money::from_cents(cents),
            kind,
            "acc_checking_001",
            "usd",
        );
        match category {
            Some(c) => txn.with_category(c),
            None => txn,
        }
    }

    fn december() -> AggregationConfig {
        AggregationConfig::new(date(2025, 12, 1), date(2025, 12, 31))
    }

    fn scenario() -> Vec<AnyTransaction> {
        vec![
            txn(
                "txn_001",
                date(2025, 12, 1),
                5000,
                TransactionType::Expense,
                Some("groceries"),
            )
            .into(),
            txn(
                "txn_002",
                date(2025, 12, 15),
                300000,
                TransactionType::Income,
                Some("salary"),
            )
            .into(),
        ]
    }

    #[test]
    fn test_december_scenario() {
        let dir = directory();
        let report = Aggregator::new(&dir)
            .aggregate(&[checking()], &scenario(), &december())
            .unwrap();

        assert_eq!(report.monthly_aggregates.len(), 1);
        let month = &report.monthly_aggregates[0];
        assert_eq!(month.month.to_string(), "2025-12");
        assert_eq!(month.actual_income, Money::from_cents(300000));
        assert_eq!(month.actual_expense, Money::from_cents(5000));
        assert_eq!(month.projected_income, Money::zero());
        assert_eq!(month.projected_expense, Money::zero());

        let summary = &report.account_summaries[0];
        assert_eq!(summary.total_income, Money::from_cents(300000));
        assert_eq!(summary.total_expense, Money::from_cents(5000));
        assert_eq!(summary.net, Money::from_cents(295000));
        assert_eq!(summary.balance, Money::from_cents(295000));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_reversed_window_is_fatal() {
        let dir = directory();
        let config = AggregationConfig::new(date(2025, 12, 31), date(2025, 12, 1));
        let err = Aggregator::new(&dir)
            .aggregate(&[checking()], &scenario(), &config)
            .unwrap_err();
        assert!(err.is_invalid_window());
    }

    #[test]
    fn test_empty_input() {
        let dir = directory();
        let report = Aggregator::new(&dir)
            .aggregate(&[checking()], &[], &december())
            .unwrap();

        assert_eq!(report.account_summaries.len(), 1);
        let summary = &report.account_summaries[0];
        assert_eq!(summary.balance, Money::zero());
        assert_eq!(summary.net, Money::zero());
        assert!(report.category_aggregates.is_empty());
        assert!(report.monthly_aggregates.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let dir = directory();
        let transactions: Vec<AnyTransaction> = vec![
            txn("a", date(2025, 11, 30), 100, TransactionType::Expense, Some("rent")).into(),
            txn("b", date(2025, 12, 1), 200, TransactionType::Expense, Some("rent")).into(),
            txn("c", date(2025, 12, 31), 300, TransactionType::Expense, Some("rent")).into(),
            txn("d", date(2026, 1, 1), 400, TransactionType::Expense, Some("rent")).into(),
        ];
        let report = Aggregator::new(&dir)
            .aggregate(&[checking()], &transactions, &december())
            .unwrap();

        assert_eq!(report.category_aggregates[0].actual_amount, Money::from_cents(500));
        assert_eq!(report.account_summaries[0].total_expense, Money::from_cents(500));
        // history before the window still feeds the derived balance
        assert_eq!(report.account_summaries[0].balance, Money::from_cents(-600));
    }

    #[test]
    fn test_actual_and_projected_are_kept_apart() {
        let dir = directory();
        let projected = ProjectedTransaction::new(
            txn("proj_rent", date(2025, 12, 1), 150000, TransactionType::Expense, Some("rent")),
            Some(Frequency::Monthly),
        );
        let transactions: Vec<AnyTransaction> = vec![
            txn("txn_rent", date(2025, 12, 1), 145000, TransactionType::Expense, Some("rent")).into(),
            projected.into(),
        ];
        let report = Aggregator::new(&dir)
            .aggregate(&[checking()], &transactions, &december())
            .unwrap();

        let rent = &report.category_aggregates[0];
        assert_eq!(rent.actual_amount, Money::from_cents(145000));
        assert_eq!(rent.projected_amount, Money::from_cents(150000));
        assert_eq!(rent.percentage, 1.0);

        let month = &report.monthly_aggregates[0];
        assert_eq!(month.actual_expense, Money::from_cents(145000));
        assert_eq!(month.projected_expense, Money::from_cents(150000));

        // projections never touch account totals
        assert_eq!(report.account_summaries[0].total_expense, Money::from_cents(145000));
    }

    #[test]
    fn test_known_balance_is_not_recomputed() {
        let dir = directory();
        let account = checking().with_balance(Money::from_cents(245075));
        let report = Aggregator::new(&dir)
            .aggregate(&[account], &scenario(), &december())
            .unwrap();
        assert_eq!(report.account_summaries[0].balance, Money::from_cents(245075));
        assert!(!report.account_summaries[0].balance_derived);
    }

    #[test]
    fn test_inconsistent_category_type_is_warned_but_counted() {
        let dir = directory();
        let transactions: Vec<AnyTransaction> = vec![txn(
            "txn_refund",
            date(2025, 12, 3),
            2000,
            TransactionType::Income,
            Some("groceries"),
        )
        .into()];
        let report = Aggregator::new(&dir)
            .aggregate(&[checking()], &transactions, &december())
            .unwrap();

        assert_eq!(report.category_aggregates[0].actual_amount, Money::from_cents(2000));
        assert_eq!(report.warnings.len(), 1);
        assert!(matches!(
            &report.warnings[0],
            EngineWarning::InconsistentCategoryType { transaction_id, .. } if transaction_id == "txn_refund"
        ));
    }

    #[test]
    fn test_percentages_and_uncategorized() {
        let dir = directory();
        let transactions: Vec<AnyTransaction> = vec![
            txn("a", date(2025, 12, 2), 2500, TransactionType::Expense, Some("groceries")).into(),
            txn("b", date(2025, 12, 3), 7500, TransactionType::Expense, Some("rent")).into(),
            txn("c", date(2025, 12, 4), 999, TransactionType::Expense, None).into(),
        ];
        let report = Aggregator::new(&dir)
            .aggregate(&[checking()], &transactions, &december())
            .unwrap();

        let ids: Vec<&str> = report
            .category_aggregates
            .iter()
            .map(|a| a.category_id.as_str())
            .collect();
        assert_eq!(ids, vec!["groceries", "rent"]);
        assert_eq!(report.category_aggregates[0].percentage, 0.25);
        assert_eq!(report.category_aggregates[1].percentage, 0.75);
        assert_eq!(report.uncategorized.actual_amount, Money::from_cents(999));
        assert_eq!(report.uncategorized.transaction_count, 1);
        assert_eq!(report.monthly_aggregates[0].actual_expense, Money::from_cents(10999));
    }

    #[test]
    fn test_category_scope() {
        let dir = directory();
        let config = december().with_categories(["salary"]);
        let report = Aggregator::new(&dir)
            .aggregate(&[checking()], &scenario(), &config)
            .unwrap();

        assert_eq!(report.category_aggregates.len(), 1);
        assert_eq!(report.monthly_aggregates[0].actual_expense, Money::zero());
        // account summaries ignore the category scope
        assert_eq!(report.account_summaries[0].total_expense, Money::from_cents(5000));
    }

    #[test]
    fn test_account_scope() {
        let dir = directory();
        let savings = Account::new(
            "acc_savings_001",
            "Savings",
            AccountSubType::SavingsGoal,
            "inst_ally",
            "usd",
        );
        let config = december().with_accounts(["acc_savings_001"]);
        let report = Aggregator::new(&dir)
            .aggregate(&[checking(), savings], &scenario(), &config)
            .unwrap();

        assert_eq!(report.account_summaries.len(), 1);
        assert_eq!(report.account_summaries[0].account_id.as_str(), "acc_savings_001");
        assert!(report.category_aggregates.is_empty());
        assert!(report.monthly_aggregates.is_empty());
    }

    #[test]
    fn test_empty_scope_is_rejected() {
        let dir = directory();
        let config = december().with_categories(Vec::<String>::new());
        assert!(Aggregator::new(&dir)
            .aggregate(&[checking()], &scenario(), &config)
            .is_err());
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let dir = directory();
        let mut reversed = scenario();
        reversed.reverse();
        let aggregator = Aggregator::new(&dir);
        let a = aggregator.aggregate(&[checking()], &scenario(), &december()).unwrap();
        let b = aggregator.aggregate(&[checking()], &reversed, &december()).unwrap();
        assert_eq!(a, b);
    }

    fn with_amount(mut txn: Transaction, amount: f64) -> Transaction {
        txn.amount = Money::from_decimal(amount).unwrap();
        txn
    }

    #[test]
    fn test_sub_cent_amounts_are_conserved() {
        let dir = directory();
        let transactions: Vec<AnyTransaction> = (1..=3)
            .map(|day| {
                let id = format!("txn_btc_{}", day);
                let base = txn(&id, date(2025, 12, day), 0, TransactionType::Income, Some("salary"));
                with_amount(base, 0.004).into()
            })
            .collect();
        let report = Aggregator::new(&dir)
            .aggregate(&[checking()], &transactions, &december())
            .unwrap();

        let expected = Money::from_decimal(0.012).unwrap();
        assert_eq!(report.category_aggregates[0].actual_amount, expected);
        assert_eq!(report.monthly_aggregates[0].actual_income, expected);
        assert_eq!(report.account_summaries[0].total_income, expected);
        assert_eq!(report.account_summaries[0].balance.to_string(), "0.012");
    }

    #[test]
    fn test_large_totals_accumulate_without_overflow() {
        let dir = directory();
        let transactions: Vec<AnyTransaction> = (0..1100)
            .map(|i| {
                let id = format!("txn_{:04}", i);
                let base = txn(&id, date(2025, 12, 10), 0, TransactionType::Income, Some("salary"));
                with_amount(base, 89_000_000_000_000.0).into()
            })
            .collect();
        let report = Aggregator::new(&dir)
            .aggregate(&[checking()], &transactions, &december())
            .unwrap();

        let summary = &report.account_summaries[0];
        assert_eq!(summary.total_income.to_string(), "97900000000000000.00");
        assert_eq!(summary.balance, summary.total_income);
        assert_eq!(report.monthly_aggregates[0].actual_income, summary.total_income);
    }
}
