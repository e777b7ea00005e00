//! Account, institution and currency models
//!
//! Accounts reference an institution and a currency. The balance is optional:
//! when it is absent the aggregator derives it from transaction history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::ids::{AccountId, CurrencyId, InstitutionId};
use super::money::Money;
use super::record::{decode_all, record_key};
use super::transaction::required;
use crate::error::EngineWarning;

/// High-level type of financial account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    CreditCard,
    Savings,
    Investment,
    Checking,
}

impl AccountType {
    /// Parse account type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "credit_card" | "credit" | "creditcard" => Some(Self::CreditCard),
            "savings" => Some(Self::Savings),
            "investment" => Some(Self::Investment),
            "checking" => Some(Self::Checking),
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreditCard => write!(f, "Credit Card"),
            Self::Savings => write!(f, "Savings"),
            Self::Investment => write!(f, "Investment"),
            Self::Checking => write!(f, "Checking"),
        }
    }
}

/// Finer-grained account type; each belongs to exactly one `AccountType`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountSubType {
    CreditCardPersonal,
    CreditCardCorporate,
    SavingsEmergency,
    SavingsGoal,
    InvestmentStocks,
    InvestmentCrypto,
    InvestmentMutualFunds,
    CheckingPersonal,
    CheckingBusiness,
}

impl AccountSubType {
    /// The account type this sub-type refines
    pub fn account_type(&self) -> AccountType {
        match self {
            Self::CreditCardPersonal | Self::CreditCardCorporate => AccountType::CreditCard,
            Self::SavingsEmergency | Self::SavingsGoal => AccountType::Savings,
            Self::InvestmentStocks | Self::InvestmentCrypto | Self::InvestmentMutualFunds => {
                AccountType::Investment
            }
            Self::CheckingPersonal | Self::CheckingBusiness => AccountType::Checking,
        }
    }

    /// Parse a sub-type from its snake_case name
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "credit_card_personal" => Some(Self::CreditCardPersonal),
            "credit_card_corporate" => Some(Self::CreditCardCorporate),
            "savings_emergency" => Some(Self::SavingsEmergency),
            "savings_goal" => Some(Self::SavingsGoal),
            "investment_stocks" => Some(Self::InvestmentStocks),
            "investment_crypto" => Some(Self::InvestmentCrypto),
            "investment_mutual_funds" => Some(Self::InvestmentMutualFunds),
            "checking_personal" => Some(Self::CheckingPersonal),
            "checking_business" => Some(Self::CheckingBusiness),
            _ => None,
        }
    }
}

/// A financial account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAccount", into = "RawAccount")]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,

    /// Display name
    pub name: String,

    /// High-level type
    pub account_type: AccountType,

    /// Sub-type, consistent with `account_type`
    pub sub_type: AccountSubType,

    /// Institution holding the account
    pub institution_id: InstitutionId,

    /// Native currency of the account
    pub currency_id: CurrencyId,

    /// Known current balance; None means "derive from history"
    pub balance: Option<Money>,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with an unknown balance
    pub fn new(
        id: impl Into<AccountId>,
        name: impl Into<String>,
        sub_type: AccountSubType,
        institution_id: impl Into<InstitutionId>,
        currency_id: impl Into<CurrencyId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            account_type: sub_type.account_type(),
            sub_type,
            institution_id: institution_id.into(),
            currency_id: currency_id.into(),
            balance: None,
            created_at: Utc::now(),
        }
    }

    /// Builder-style setter for a known balance
    pub fn with_balance(mut self, balance: Money) -> Self {
        self.balance = Some(balance);
        self
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }

        if self.sub_type.account_type() != self.account_type {
            return Err(AccountValidationError::SubTypeMismatch {
                account_type: self.account_type,
                sub_type: self.sub_type,
            });
        }

        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.account_type)
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    MissingField(&'static str),
    EmptyName,
    InvalidType(String),
    InvalidSubType(String),
    SubTypeMismatch {
        account_type: AccountType,
        sub_type: AccountSubType,
    },
    InvalidTimestamp(String),
    InvalidBalance(String),
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing field '{}'", field),
            Self::EmptyName => write!(f, "account name cannot be empty"),
            Self::InvalidType(s) => write!(f, "unknown account type '{}'", s),
            Self::InvalidSubType(s) => write!(f, "unknown account sub-type '{}'", s),
            Self::SubTypeMismatch {
                account_type,
                sub_type,
            } => write!(
                f,
                "sub-type {:?} does not belong to account type {}",
                sub_type, account_type
            ),
            Self::InvalidTimestamp(s) => write!(f, "unparseable timestamp '{}'", s),
            Self::InvalidBalance(s) => write!(f, "invalid balance {}", s),
        }
    }
}

impl std::error::Error for AccountValidationError {}

/// Account record as supplied by collaborators, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAccount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl RawAccount {
    /// Identifier used when reporting problems with this record
    pub fn record_id(&self, index: usize) -> String {
        record_key(self.id.as_deref(), index)
    }

    /// Validate and convert into a typed account
    pub fn validate(&self) -> Result<Account, AccountValidationError> {
        use AccountValidationError as E;

        let id = required(&self.id, "id").map_err(E::MissingField)?;
        let name = required(&self.name, "name").map_err(E::MissingField)?;

        let type_str = required(&self.account_type, "type").map_err(E::MissingField)?;
        let account_type =
            AccountType::parse(type_str).ok_or_else(|| E::InvalidType(type_str.to_string()))?;

        let sub_type_str = required(&self.sub_type, "subType").map_err(E::MissingField)?;
        let sub_type = AccountSubType::parse(sub_type_str)
            .ok_or_else(|| E::InvalidSubType(sub_type_str.to_string()))?;

        let institution_id =
            required(&self.institution_id, "institutionId").map_err(E::MissingField)?;
        let currency_id = required(&self.currency_id, "currencyId").map_err(E::MissingField)?;

        let created_str = required(&self.created_at, "createdAt").map_err(E::MissingField)?;
        let created_at = DateTime::parse_from_rfc3339(created_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| E::InvalidTimestamp(created_str.to_string()))?;

        let balance = self
            .balance
            .map(|b| Money::from_decimal(b).map_err(|_| E::InvalidBalance(b.to_string())))
            .transpose()?;

        let account = Account {
            id: AccountId::from(id),
            name: name.to_string(),
            account_type,
            sub_type,
            institution_id: InstitutionId::from(institution_id),
            currency_id: CurrencyId::from(currency_id),
            balance,
            created_at,
        };
        account.validate()?;

        Ok(account)
    }
}

impl TryFrom<RawAccount> for Account {
    type Error = AccountValidationError;

    fn try_from(raw: RawAccount) -> Result<Self, Self::Error> {
        raw.validate()
    }
}

impl From<Account> for RawAccount {
    fn from(account: Account) -> Self {
        let account_type = serde_json::to_value(account.account_type)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string));
        let sub_type = serde_json::to_value(account.sub_type)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string));
        Self {
            id: Some(account.id.to_string()),
            name: Some(account.name),
            account_type,
            sub_type,
            institution_id: Some(account.institution_id.to_string()),
            currency_id: Some(account.currency_id.to_string()),
            balance: account.balance.map(|b| b.to_f64()),
            created_at: Some(account.created_at.to_rfc3339()),
        }
    }
}

/// Validate a batch of raw accounts, reporting the malformed ones
pub fn validate_accounts(raw: &[Value]) -> (Vec<Account>, Vec<EngineWarning>) {
    decode_all(raw, |record: RawAccount, index| {
        record
            .validate()
            .map_err(|e| (record.record_id(index), e.to_string()))
    })
}

/// A currency; reference data used to label outputs, never to convert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub id: CurrencyId,
    /// ISO 4217 code
    pub code: String,
    pub symbol: String,
    pub name: String,
}

/// A bank, broker or exchange holding accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Institution {
    pub id: InstitutionId,
    pub name: String,
    /// Free-form kind, e.g. "bank", "broker", "crypto_exchange"
    #[serde(rename = "type")]
    pub kind: String,
}
