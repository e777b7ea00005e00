//! Per-account summaries
//!
//! One row per account in scope: balance plus in-window income and expense.

use serde::Serialize;

use crate::display::report::{double_separator, separator, truncate};
use crate::models::{Account, AccountId, AccountType, CurrencyId, Money};

/// Summary of one account over a window
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub account_id: AccountId,
    pub account_name: String,
    pub account_type: AccountType,
    /// Amounts are in this currency; nothing is converted
    pub currency_id: CurrencyId,
    /// Known balance, or the running sum of actual effects up to the window end
    pub balance: Money,
    /// True when `balance` was derived from transaction history
    pub balance_derived: bool,
    pub total_income: Money,
    pub total_expense: Money,
    pub net: Money,
    /// Actual transactions inside the window
    pub transaction_count: usize,
}

impl AccountSummary {
    /// Build a summary from accumulated totals
    ///
    /// `derived_balance` is used only when the account has no known balance.
    pub fn new(
        account: &Account,
        derived_balance: Money,
        total_income: Money,
        total_expense: Money,
        transaction_count: usize,
    ) -> Self {
        let (balance, balance_derived) = match account.balance {
            Some(known) => (known, false),
            None => (derived_balance, true),
        };

        Self {
            account_id: account.id.clone(),
            account_name: account.name.clone(),
            account_type: account.account_type,
            currency_id: account.currency_id.clone(),
            balance,
            balance_derived,
            total_income,
            total_expense,
            net: total_income - total_expense,
            transaction_count,
        }
    }
}

/// Format account summaries as a terminal table
pub fn format_account_summaries(summaries: &[AccountSummary], symbol: &str) -> String {
    let mut output = String::new();

    output.push_str("Accounts\n");
    output.push_str(&double_separator(86));
    output.push('\n');

    if summaries.is_empty() {
        output.push_str("No accounts in scope.\n");
        return output;
    }

    output.push_str(&format!(
        "{:<28} {:>14} {:>14} {:>14} {:>14}\n",
        "Account", "Balance", "Income", "Expense", "Net"
    ));
    output.push_str(&separator(86));
    output.push('\n');

    for summary in summaries {
        let marker = if summary.balance_derived { "*" } else { "" };
        output.push_str(&format!(
            "{:<28} {:>14} {:>14} {:>14} {:>14}\n",
            truncate(&summary.account_name, 28),
            format!("{}{}", summary.balance.format_with_symbol(symbol), marker),
            summary.total_income.format_with_symbol(symbol),
            summary.total_expense.format_with_symbol(symbol),
            summary.net.format_with_symbol(symbol),
        ));
    }

    if summaries.iter().any(|s| s.balance_derived) {
        output.push_str("* balance derived from transaction history\n");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountSubType;

    fn checking() -> Account {
        Account::new(
            "acc_checking_001",
            "Main Checking",
            AccountSubType::CheckingPersonal,
            "inst_chase",
            "usd",
        )
    }

    #[test]
    fn test_net_is_income_minus_expense() {
        let summary = AccountSummary::new(
            &checking(),
            Money::from_cents(295000),
            Money::from_cents(300000),
            Money::from_cents(5000),
            2,
        );
        assert_eq!(summary.net, Money::from_cents(295000));
        assert!(summary.balance_derived);
        assert_eq!(summary.balance, Money::from_cents(295000));
    }

    #[test]
    fn test_known_balance_wins() {
        let account = checking().with_balance(Money::from_cents(245075));
        let summary = AccountSummary::new(&account, Money::zero(), Money::zero(), Money::zero(), 0);
        assert_eq!(summary.balance, Money::from_cents(245075));
        assert!(!summary.balance_derived);
    }

    #[test]
    fn test_format_marks_derived_balances() {
        let summary = AccountSummary::new(&checking(), Money::from_cents(1000), Money::zero(), Money::zero(), 0);
        let output = format_account_summaries(&[summary], "$");
        assert!(output.contains("Main Checking"));
        assert!(output.contains("$10.00*"));
        assert!(output.contains("derived from transaction history"));
    }
}
