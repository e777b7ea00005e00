//! Savings goal model
//!
//! Goals are not consumed by the aggregator. Their progress is evaluated
//! separately (see `reports::goals`) once account summaries are known.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, GoalId};
use super::money::Money;

/// A savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub name: String,
    pub target_amount: Money,
    /// Recorded progress; None means "derive from the linked account"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    /// Linked savings account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Create a new goal
    pub fn new(id: impl Into<GoalId>, name: impl Into<String>, target_amount: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            target_amount,
            current_amount: None,
            target_date: None,
            account_id: None,
            created_at: Utc::now(),
        }
    }

    /// Builder-style setter for the linked account
    pub fn linked_to(mut self, account_id: impl Into<AccountId>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// Amount still missing, never negative
    pub fn remaining(&self, current: Money) -> Money {
        let remaining = self.target_amount - current;
        if remaining.is_negative() {
            Money::zero()
        } else {
            remaining
        }
    }

    /// Progress as a ratio of the target (0.0 when the target is zero)
    pub fn fraction(&self, current: Money) -> f64 {
        current.ratio_of(self.target_amount)
    }

    /// Whether `current` reaches the target
    pub fn is_met(&self, current: Money) -> bool {
        current >= self.target_amount
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.target_amount)
    }
}
