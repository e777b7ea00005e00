//! Transaction model
//!
//! Actual (posted) and projected (forecast) transactions share the same set
//! of fields. `AnyTransaction` is the tagged union of the two; on the wire the
//! variants are told apart by the boolean `isProjected` flag.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::ids::{AccountId, CategoryId, CurrencyId, TransactionId};
use super::money::Money;
use super::record::{decode_all, record_key};
use crate::error::EngineWarning;

/// Direction of a transaction, and of the categories it can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in (salary, refunds)
    Income,
    /// Money going out (groceries, rent)
    Expense,
}

impl TransactionType {
    /// Parse a transaction type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Apply the direction to a non-negative amount
    pub fn signed(&self, amount: Money) -> Money {
        match self {
            Self::Income => amount,
            Self::Expense => -amount,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

/// Recurrence of a projected transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Once,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    /// Parse a frequency from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "once" => Some(Self::Once),
            "monthly" => Some(Self::Monthly),
            "quarterly" => Some(Self::Quarterly),
            "yearly" | "annual" | "annually" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// Number of months between two occurrences, None for one-off projections
    pub fn step_months(&self) -> Option<u32> {
        match self {
            Self::Once => None,
            Self::Monthly => Some(1),
            Self::Quarterly => Some(3),
            Self::Yearly => Some(12),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Once => write!(f, "once"),
            Self::Monthly => write!(f, "monthly"),
            Self::Quarterly => write!(f, "quarterly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

/// Fields shared by actual and projected transactions
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Posting date (or next occurrence date for projections)
    pub date: NaiveDate,

    /// Free-text description, the target of category patterns
    pub description: String,

    /// Amount in the account's currency, never negative
    pub amount: Money,

    /// Category ID (None when the source left it empty)
    pub category: Option<CategoryId>,

    /// Whether the amount adds to or subtracts from the account
    pub kind: TransactionType,

    /// The account this transaction belongs to
    pub account_id: AccountId,

    /// Currency of the amount
    pub currency_id: CurrencyId,
}

impl Transaction {
    /// Create a new transaction without a category
    pub fn new(
        id: impl Into<TransactionId>,
        date: NaiveDate,
        description: impl Into<String>,
        amount: Money,
        kind: TransactionType,
        account_id: impl Into<AccountId>,
        currency_id: impl Into<CurrencyId>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            description: description.into(),
            amount,
            category: None,
            kind,
            account_id: account_id.into(),
            currency_id: currency_id.into(),
        }
    }

    /// Builder-style setter for the category
    pub fn with_category(mut self, category: impl Into<CategoryId>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Amount with the direction applied (income positive, expense negative)
    pub fn signed_amount(&self) -> Money {
        self.kind.signed(self.amount)
    }

    /// Check if this is income
    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.signed_amount()
        )
    }
}

/// A forecast transaction, possibly recurring
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedTransaction {
    pub transaction: Transaction,

    /// Recurrence; expanding it is the job of the projection generator
    pub frequency: Option<Frequency>,
}

impl ProjectedTransaction {
    /// Create a projected transaction
    pub fn new(transaction: Transaction, frequency: Option<Frequency>) -> Self {
        Self {
            transaction,
            frequency,
        }
    }
}

/// Either an actual or a projected transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTransaction", into = "RawTransaction")]
pub enum AnyTransaction {
    Actual(Transaction),
    Projected(ProjectedTransaction),
}

impl AnyTransaction {
    /// The shared transaction fields
    pub fn details(&self) -> &Transaction {
        match self {
            Self::Actual(txn) => txn,
            Self::Projected(projected) => &projected.transaction,
        }
    }

    /// Mutable access to the shared transaction fields
    pub fn details_mut(&mut self) -> &mut Transaction {
        match self {
            Self::Actual(txn) => txn,
            Self::Projected(projected) => &mut projected.transaction,
        }
    }

    /// Check if this is a forecast
    pub fn is_projected(&self) -> bool {
        matches!(self, Self::Projected(_))
    }

    pub fn id(&self) -> &TransactionId {
        &self.details().id
    }

    pub fn date(&self) -> NaiveDate {
        self.details().date
    }

    pub fn category(&self) -> Option<&CategoryId> {
        self.details().category.as_ref()
    }

    /// Key giving a total, reproducible accumulation order
    pub fn ordering_key(&self) -> (NaiveDate, &TransactionId, bool) {
        (self.date(), self.id(), self.is_projected())
    }
}

impl From<Transaction> for AnyTransaction {
    fn from(txn: Transaction) -> Self {
        Self::Actual(txn)
    }
}

impl From<ProjectedTransaction> for AnyTransaction {
    fn from(projected: ProjectedTransaction) -> Self {
        Self::Projected(projected)
    }
}

/// Transaction record as supplied by collaborators, before validation
///
/// Every field is optional so that a record with missing data can still be
/// read and reported instead of failing a whole batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_projected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
}

/// Why a raw transaction could not be turned into a typed one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    MissingField(&'static str),
    InvalidDate(String),
    InvalidAmount(String),
    NegativeAmount(String),
    InvalidType(String),
    InvalidFrequency(String),
    FrequencyOnActual,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing field '{}'", field),
            Self::InvalidDate(s) => write!(f, "unparseable date '{}' (expected YYYY-MM-DD)", s),
            Self::InvalidAmount(s) => write!(f, "invalid amount {}", s),
            Self::NegativeAmount(s) => write!(f, "negative amount {}", s),
            Self::InvalidType(s) => write!(f, "unknown transaction type '{}'", s),
            Self::InvalidFrequency(s) => write!(f, "unknown frequency '{}'", s),
            Self::FrequencyOnActual => {
                write!(f, "frequency is only allowed on projected transactions")
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}

/// Read a required, non-blank string field
pub(crate) fn required<'a>(
    value: &'a Option<String>,
    field: &'static str,
) -> Result<&'a str, &'static str> {
    match value.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(field),
    }
}

/// Parse an ISO calendar date (YYYY-MM-DD)
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

impl RawTransaction {
    /// Identifier used when reporting problems with this record
    pub fn record_id(&self, index: usize) -> String {
        record_key(self.id.as_deref(), index)
    }

    /// Validate and convert into a typed transaction
    pub fn validate(&self) -> Result<AnyTransaction, TransactionValidationError> {
        use TransactionValidationError as E;

        let id = required(&self.id, "id").map_err(E::MissingField)?;
        let date_str = required(&self.date, "date").map_err(E::MissingField)?;
        let date = parse_iso_date(date_str).ok_or_else(|| E::InvalidDate(date_str.to_string()))?;
        let description = self
            .description
            .as_deref()
            .ok_or(E::MissingField("description"))?;

        let raw_amount = self.amount.ok_or(E::MissingField("amount"))?;
        if raw_amount < 0.0 {
            return Err(E::NegativeAmount(raw_amount.to_string()));
        }
        let amount =
            Money::from_decimal(raw_amount).map_err(|_| E::InvalidAmount(raw_amount.to_string()))?;

        let kind_str = required(&self.kind, "type").map_err(E::MissingField)?;
        let kind =
            TransactionType::parse(kind_str).ok_or_else(|| E::InvalidType(kind_str.to_string()))?;

        let account_id = required(&self.account_id, "accountId").map_err(E::MissingField)?;
        let currency_id = required(&self.currency_id, "currencyId").map_err(E::MissingField)?;
        let is_projected = self.is_projected.ok_or(E::MissingField("isProjected"))?;

        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(CategoryId::from);

        let frequency = match self.frequency.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(Frequency::parse(s).ok_or_else(|| E::InvalidFrequency(s.to_string()))?),
        };

        let transaction = Transaction {
            id: TransactionId::from(id),
            date,
            description: description.to_string(),
            amount,
            category,
            kind,
            account_id: AccountId::from(account_id),
            currency_id: CurrencyId::from(currency_id),
        };

        if is_projected {
            Ok(AnyTransaction::Projected(ProjectedTransaction::new(
                transaction,
                frequency,
            )))
        } else if frequency.is_some() {
            Err(E::FrequencyOnActual)
        } else {
            Ok(AnyTransaction::Actual(transaction))
        }
    }
}

impl TryFrom<RawTransaction> for AnyTransaction {
    type Error = TransactionValidationError;

    fn try_from(raw: RawTransaction) -> Result<Self, Self::Error> {
        raw.validate()
    }
}

impl From<AnyTransaction> for RawTransaction {
    fn from(txn: AnyTransaction) -> Self {
        let (transaction, is_projected, frequency) = match txn {
            AnyTransaction::Actual(t) => (t, false, None),
            AnyTransaction::Projected(p) => (p.transaction, true, p.frequency),
        };
        Self {
            id: Some(transaction.id.to_string()),
            date: Some(transaction.date.format("%Y-%m-%d").to_string()),
            description: Some(transaction.description),
            amount: Some(transaction.amount.to_f64()),
            category: Some(
                transaction
                    .category
                    .map(|c| c.to_string())
                    .unwrap_or_default(),
            ),
            kind: Some(transaction.kind.to_string()),
            account_id: Some(transaction.account_id.to_string()),
            currency_id: Some(transaction.currency_id.to_string()),
            is_projected: Some(is_projected),
            frequency: frequency.map(|f| f.to_string()),
        }
    }
}

/// Decode and validate a batch of transaction records
///
/// Valid records are returned in input order. Every record that fails to
/// decode (a field of the wrong type) or to validate yields a
/// `MalformedRecord` warning and is left out.
pub fn validate_transactions(raw: &[Value]) -> (Vec<AnyTransaction>, Vec<EngineWarning>) {
    decode_all(raw, |record: RawTransaction, index| {
        record
            .validate()
            .map_err(|e| (record.record_id(index), e.to_string()))
    })
}
