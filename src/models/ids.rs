//! Strongly-typed ID wrappers for all entity types
//!
//! Identifiers arrive from collaborators as opaque strings ("txn_001",
//! "acc_checking_001"). Wrapping them prevents mixing up IDs from different
//! entity types at compile time.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an ID from any string-like value
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(AccountId);
define_id!(TransactionId);
define_id!(CategoryId);
define_id!(PatternId);
define_id!(CurrencyId);
define_id!(InstitutionId);
define_id!(GoalId);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_id_display() {
        let id = AccountId::new("acc_checking_001");
        assert_eq!(format!("{}", id), "acc_checking_001");
        assert_eq!(id.as_str(), "acc_checking_001");
    }

    #[test]
    fn test_id_serialization_is_transparent() {
        let id = CategoryId::new("cat_groceries");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"cat_groceries\"");

        let deserialized: CategoryId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(CategoryId::new("cat_rent"), 1);
        assert_eq!(map.get("cat_rent"), Some(&1));
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let mut ids = vec![TransactionId::new("txn_b"), TransactionId::new("txn_a")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "txn_a");
    }
}
