//! Custom error types for fintrack
//!
//! Two families live here. `FintrackError` covers call-level failures that
//! abort an operation with no partial output. `EngineWarning` covers
//! per-record problems that are collected and returned next to a successful
//! result.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::models::{CategoryId, TransactionType};

/// The main error type for fintrack operations
#[derive(Error, Debug)]
pub enum FintrackError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Dataset loading errors (unreadable file, unknown format)
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Validation errors for call arguments
    #[error("Validation error: {0}")]
    Validation(String),

    /// Report export errors
    #[error("Export error: {0}")]
    Export(String),

    /// The aggregation window ends before it starts
    #[error("Invalid window: end {end} precedes start {start}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    /// A scope was supplied but selects nothing
    #[error("Empty {0} scope: pass no scope to select everything")]
    EmptyScope(&'static str),
}

impl FintrackError {
    /// Create an invalid-window error
    pub fn invalid_window(start: NaiveDate, end: NaiveDate) -> Self {
        Self::InvalidWindow { start, end }
    }

    /// Check if this is an invalid-window error
    pub fn is_invalid_window(&self) -> bool {
        matches!(self, Self::InvalidWindow { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for FintrackError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FintrackError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for FintrackError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Dataset(err.to_string())
    }
}

/// Result type alias for fintrack operations
pub type FintrackResult<T> = Result<T, FintrackError>;

/// A non-fatal problem found while processing one record
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EngineWarning {
    /// A category pattern could not be used and was skipped
    #[error("Pattern '{pattern_id}' skipped: {reason}")]
    #[serde(rename_all = "camelCase")]
    MalformedPattern { pattern_id: String, reason: String },

    /// A transaction or account was excluded from processing
    #[error("Record '{record_id}' excluded: {reason}")]
    #[serde(rename_all = "camelCase")]
    MalformedRecord { record_id: String, reason: String },

    /// Transaction type disagrees with the type of its category
    #[error(
        "Transaction '{transaction_id}' is {transaction_type} but category '{category_id}' is {category_type}"
    )]
    #[serde(rename_all = "camelCase")]
    InconsistentCategoryType {
        transaction_id: String,
        category_id: CategoryId,
        transaction_type: TransactionType,
        category_type: TransactionType,
    },

    /// Following parent links from a category leads back to itself
    #[error("Category '{category_id}' is part of a parent cycle")]
    #[serde(rename_all = "camelCase")]
    CategoryCycle { category_id: CategoryId },
}

impl EngineWarning {
    /// Create a malformed-record warning
    pub fn malformed_record(record_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            record_id: record_id.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed-pattern warning
    pub fn malformed_pattern(pattern_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedPattern {
            pattern_id: pattern_id.into(),
            reason: reason.into(),
        }
    }

    /// Identifier of the record or pattern the warning is about
    pub fn subject_id(&self) -> &str {
        match self {
            Self::MalformedPattern { pattern_id, .. } => pattern_id,
            Self::MalformedRecord { record_id, .. } => record_id,
            Self::InconsistentCategoryType { transaction_id, .. } => transaction_id,
            Self::CategoryCycle { category_id } => category_id.as_str(),
        }
    }

    /// Emit this warning through the tracing subscriber
    pub(crate) fn emit(&self) {
        tracing::warn!(subject = self.subject_id(), "{}", self);
    }
}
