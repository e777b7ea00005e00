//! Core data models for fintrack
//!
//! Accounts, transactions, categories and patterns as collaborators supply
//! them, plus the call-level aggregation window and scopes.

pub mod account;
pub mod category;
pub mod goal;
pub mod ids;
pub mod money;
mod record;
pub mod transaction;
pub mod window;

pub use account::{
    validate_accounts, Account, AccountSubType, AccountType, Currency, Institution, RawAccount,
};
pub use category::{Category, CategoryDirectory, CategoryPattern, MatchType};
pub use goal::Goal;
pub use ids::{AccountId, CategoryId, CurrencyId, GoalId, InstitutionId, PatternId, TransactionId};
pub use money::Money;
pub use transaction::{
    validate_transactions, AnyTransaction, Frequency, ProjectedTransaction, RawTransaction,
    Transaction, TransactionType,
};
pub use window::{AggregationConfig, DateWindow, Month};
