//! Goal progress
//!
//! Evaluated after aggregation: a goal without a recorded amount borrows
//! the balance of its linked account's summary.

use chrono::NaiveDate;
use serde::Serialize;

use crate::display::report::{format_bar, format_percentage, separator, truncate};
use crate::models::{Goal, GoalId, Money};
use crate::reports::AccountSummary;

/// Where a goal's current amount came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProgressSource {
    /// The goal's own `currentAmount`
    Recorded,
    /// The balance of the linked account's summary
    LinkedAccount,
    /// Neither was available
    Unknown,
}

/// Progress of one goal
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal_id: GoalId,
    pub name: String,
    pub target_amount: Money,
    pub target_date: Option<NaiveDate>,
    pub source: ProgressSource,
    pub current: Option<Money>,
    /// Target minus current, never negative
    pub remaining: Option<Money>,
    /// Current as a ratio of the target, 0 when the target is zero
    pub fraction: Option<f64>,
}

impl GoalProgress {
    /// Evaluate a goal against the account summaries of the same call
    pub fn evaluate(goal: &Goal, summaries: &[AccountSummary]) -> Self {
        let linked = goal.account_id.as_ref().and_then(|id| {
            summaries
                .iter()
                .find(|s| &s.account_id == id)
                .map(|s| s.balance)
        });

        let (source, current) = match (goal.current_amount, linked) {
            (Some(recorded), _) => (ProgressSource::Recorded, Some(recorded)),
            (None, Some(balance)) => (ProgressSource::LinkedAccount, Some(balance)),
            (None, None) => (ProgressSource::Unknown, None),
        };

        Self {
            goal_id: goal.id.clone(),
            name: goal.name.clone(),
            target_amount: goal.target_amount,
            target_date: goal.target_date,
            source,
            current,
            remaining: current.map(|c| goal.remaining(c)),
            fraction: current.map(|c| goal.fraction(c)),
        }
    }
}

/// Evaluate every goal, keeping input order
pub fn evaluate_goals(goals: &[Goal], summaries: &[AccountSummary]) -> Vec<GoalProgress> {
    goals
        .iter()
        .map(|goal| GoalProgress::evaluate(goal, summaries))
        .collect()
}

/// Format goal progress as a terminal table
pub fn format_goal_progress(progress: &[GoalProgress], symbol: &str) -> String {
    let mut output = String::new();

    output.push_str("Goals\n");
    output.push_str(&separator(86));
    output.push('\n');

    for goal in progress {
        match (goal.current, goal.fraction) {
            (Some(current), Some(fraction)) => {
                output.push_str(&format!(
                    "{:<26} {:>12} of {:>12} {:>7}  {}\n",
                    truncate(&goal.name, 26),
                    current.format_with_symbol(symbol),
                    goal.target_amount.format_with_symbol(symbol),
                    format_percentage(fraction * 100.0),
                    format_bar(fraction.min(1.0), 1.0, 20),
                ));
            }
            _ => {
                output.push_str(&format!(
                    "{:<26} {:>12} of {:>12}  (progress unknown)\n",
                    truncate(&goal.name, 26),
                    "?",
                    goal.target_amount.format_with_symbol(symbol),
                ));
            }
        }
    }

    output
}
