//! fintrack - financial aggregation and categorization engine
//!
//! Assigns categories to transactions through ordered description
//! patterns, then aggregates actual and projected transactions per
//! account, per category and per calendar month.
//!
//! # Architecture
//!
//! - `models`: Accounts, transactions, categories, patterns, goals, windows
//! - `services`: The categorizer, aggregator and the analysis pipeline
//! - `reports`: Aggregate output records and their terminal formatting
//! - `dataset`: Loading input records from JSON or YAML
//! - `export`: JSON, YAML and CSV rendering of results
//! - `config`: Paths and user settings
//! - `error`: Fatal errors and per-record warnings
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use fintrack::models::{
//!     AggregationConfig, AnyTransaction, CategoryDirectory, Money, Transaction, TransactionType,
//! };
//! use fintrack::services::Aggregator;
//!
//! let directory = CategoryDirectory::default();
//! let txn = Transaction::new(
//!     "txn_001",
//!     NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
//!     "Grocery shopping at Walmart",
//!     Money::from_cents(5000),
//!     TransactionType::Expense,
//!     "acc_checking_001",
//!     "usd",
//! )
//! .with_category("groceries");
//!
//! let config = AggregationConfig::new(
//!     NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
//! );
//! let report = Aggregator::new(&directory)
//!     .aggregate(&[], &[AnyTransaction::from(txn)], &config)
//!     .unwrap();
//! assert_eq!(report.monthly_aggregates[0].actual_expense, Money::from_cents(5000));
//! ```

pub mod cli;
pub mod config;
pub mod dataset;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;

pub use error::{EngineWarning, FintrackError, FintrackResult};
