//! Input datasets
//!
//! A `Dataset` bundles every record a caller hands to the engine. Accounts
//! and transactions stay untyped documents until validation, so that one bad
//! record (missing field, wrong type) is reported instead of failing the
//! whole load.

pub mod file_io;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

use crate::error::FintrackResult;
use crate::models::{Category, CategoryPattern, Currency, Goal, Institution};

/// Everything the engine consumes, in the collaborators' record shapes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub currencies: Vec<Currency>,
    #[serde(default)]
    pub institutions: Vec<Institution>,
    /// Account records, decoded one at a time by `validate_accounts`
    #[serde(default)]
    pub accounts: Vec<Value>,
    #[serde(default)]
    pub categories: Vec<Category>,
    /// In priority order
    #[serde(default)]
    pub patterns: Vec<CategoryPattern>,
    /// Transaction records, decoded one at a time by `validate_transactions`
    #[serde(default)]
    pub transactions: Vec<Value>,
    #[serde(default)]
    pub goals: Vec<Goal>,
}

impl Dataset {
    /// Load a dataset from a `.json`, `.yaml` or `.yml` file
    pub fn load<P: AsRef<Path>>(path: P) -> FintrackResult<Self> {
        let path = path.as_ref();
        let dataset: Self = file_io::read_document(path)?;
        debug!(
            path = %path.display(),
            accounts = dataset.accounts.len(),
            transactions = dataset.transactions.len(),
            patterns = dataset.patterns.len(),
            "loaded dataset"
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::validate_transactions;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE_YAML: &str = r#"
currencies:
  - id: usd
    code: USD
    symbol: "$"
    name: US Dollar
categories:
  - id: groceries
    name: Groceries
    type: expense
patterns:
  - id: pat_walmart
    categoryId: groceries
    pattern: walmart
    matchType: contains
    confidence: 0.9
transactions:
  - id: txn_001
    date: "2025-12-01"
    description: Grocery shopping at Walmart
    amount: 50
    type: expense
    accountId: acc_checking_001
    currencyId: usd
    isProjected: false
  - id: txn_broken
    description: no date here
"#;

    #[test]
    fn test_load_yaml_keeps_broken_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dataset.yaml");
        fs::write(&path, SAMPLE_YAML).unwrap();

        let dataset = Dataset::load(&path).unwrap();
        assert_eq!(dataset.transactions.len(), 2);
        assert_eq!(dataset.patterns.len(), 1);
        assert!(dataset.accounts.is_empty());
        assert_eq!(dataset.currencies[0].symbol, "$");
    }

    #[test]
    fn test_mistyped_record_does_not_fail_the_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dataset.json");
        fs::write(
            &path,
            r#"{"transactions": [
                {"id": "txn_good", "date": "2025-12-01", "description": "Walmart",
                 "amount": 50, "type": "expense", "accountId": "acc_1", "currencyId": "usd",
                 "isProjected": false},
                {"id": "txn_text", "date": "2025-12-02", "description": "Coffee",
                 "amount": "5.00", "type": "expense", "accountId": "acc_1", "currencyId": "usd",
                 "isProjected": false}
            ]}"#,
        )
        .unwrap();

        let dataset = Dataset::load(&path).unwrap();
        assert_eq!(dataset.transactions.len(), 2);

        let (valid, warnings) = validate_transactions(&dataset.transactions);
        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0].id().as_str(), "txn_good");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].subject_id(), "txn_text");
    }

    #[test]
    fn test_load_empty_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dataset.json");
        fs::write(&path, "{}").unwrap();

        let dataset = Dataset::load(&path).unwrap();
        assert_eq!(dataset, Dataset::default());
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dataset.txt");
        fs::write(&path, "{}").unwrap();
        assert!(Dataset::load(&path).is_err());
    }
}
