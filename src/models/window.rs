//! Aggregation windows and calendar months
//!
//! A `DateWindow` is an inclusive date range. `Month` identifies the
//! calendar month buckets of the monthly rollup ("2025-12").

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::ids::{AccountId, CategoryId};
use crate::error::{FintrackError, FintrackResult};

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Create a month, returning None if `month` is not in 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month containing `date`
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Get the next month
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Parse a "YYYY-MM" string
    pub fn parse(s: &str) -> Result<Self, MonthParseError> {
        let s = s.trim();
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| MonthParseError(s.to_string()))?;
        if month.len() != 2 {
            return Err(MonthParseError(s.to_string()));
        }
        let year: i32 = year.parse().map_err(|_| MonthParseError(s.to_string()))?;
        let month: u32 = month.parse().map_err(|_| MonthParseError(s.to_string()))?;
        Self::new(year, month).ok_or_else(|| MonthParseError(s.to_string()))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.to_string()
    }
}

impl TryFrom<String> for Month {
    type Error = MonthParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

/// Error for month strings that are not "YYYY-MM"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthParseError(pub String);

impl fmt::Display for MonthParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid month '{}' (expected YYYY-MM)", self.0)
    }
}

impl std::error::Error for MonthParseError {}

/// An inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Create a window, rejecting one whose end precedes its start
    pub fn new(start: NaiveDate, end: NaiveDate) -> FintrackResult<Self> {
        if end < start {
            return Err(FintrackError::invalid_window(start, end));
        }
        Ok(Self { start, end })
    }

    /// The whole of one calendar month
    pub fn for_month(month: Month) -> FintrackResult<Self> {
        let start = NaiveDate::from_ymd_opt(month.year(), month.month(), 1)
            .ok_or_else(|| FintrackError::Validation(format!("Month out of range: {}", month)))?;
        let next = month.next();
        let end = NaiveDate::from_ymd_opt(next.year(), next.month(), 1)
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| FintrackError::Validation(format!("Month out of range: {}", month)))?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Check if a date falls within this window (bounds included)
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Per-call aggregation configuration
///
/// Omitted scopes mean "all". A supplied but empty scope is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationConfig {
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_scope: Option<BTreeSet<AccountId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_scope: Option<BTreeSet<CategoryId>>,
}

impl AggregationConfig {
    /// Configuration covering all accounts and categories
    pub fn new(window_start: NaiveDate, window_end: NaiveDate) -> Self {
        Self {
            window_start,
            window_end,
            account_scope: None,
            category_scope: None,
        }
    }

    /// Restrict to a set of accounts
    pub fn with_accounts<I, S>(mut self, accounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<AccountId>,
    {
        self.account_scope = Some(accounts.into_iter().map(Into::into).collect());
        self
    }

    /// Restrict to a set of categories
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CategoryId>,
    {
        self.category_scope = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    /// Validate the call-level configuration and return its window
    pub fn validate(&self) -> FintrackResult<DateWindow> {
        let window = DateWindow::new(self.window_start, self.window_end)?;
        if matches!(&self.account_scope, Some(scope) if scope.is_empty()) {
            return Err(FintrackError::EmptyScope("account"));
        }
        if matches!(&self.category_scope, Some(scope) if scope.is_empty()) {
            return Err(FintrackError::EmptyScope("category"));
        }
        Ok(window)
    }

    /// Check if an account is in scope
    pub fn includes_account(&self, id: &AccountId) -> bool {
        self.account_scope
            .as_ref()
            .map_or(true, |scope| scope.contains(id))
    }

    /// Check if a (possibly absent) category is in scope
    ///
    /// With a category scope, uncategorized transactions are out of scope.
    pub fn includes_category(&self, id: Option<&CategoryId>) -> bool {
        match (&self.category_scope, id) {
            (None, _) => true,
            (Some(scope), Some(id)) => scope.contains(id),
            (Some(_), None) => false,
        }
    }
}
