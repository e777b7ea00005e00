//! Category and CategoryPattern models
//!
//! Categories are typed (income or expense) and may point at a parent. The
//! engine looks them up through a flat `CategoryDirectory`; walking parent
//! links is an explicit, cycle-aware operation.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use super::ids::{CategoryId, PatternId};
use super::transaction::TransactionType;

/// A transaction category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Display name
    pub name: String,

    /// Whether this category collects income or expenses
    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// Optional parent category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CategoryId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Matching hints, usable as implicit `contains` patterns
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Category {
    /// Create a new top-level category
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>, kind: TransactionType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            parent_id: None,
            description: None,
            keywords: Vec::new(),
            icon: None,
            color: None,
        }
    }

    /// Builder-style setter for the parent
    pub fn with_parent(mut self, parent_id: impl Into<CategoryId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Builder-style setter for keywords
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Strategy a pattern uses to match a description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Regular expression, matching anywhere in the description
    Regex,
    /// Case-insensitive substring
    Contains,
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regex => write!(f, "regex"),
            Self::Contains => write!(f, "contains"),
        }
    }
}

/// A rule linking description text to a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPattern {
    pub id: PatternId,
    pub category_id: CategoryId,
    /// Text or regular expression, depending on `match_type`
    pub pattern: String,
    pub match_type: MatchType,
    /// Score in [0, 1]; None means "use the default"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl CategoryPattern {
    /// Create a `contains` pattern
    pub fn contains(
        id: impl Into<PatternId>,
        category_id: impl Into<CategoryId>,
        pattern: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category_id: category_id.into(),
            pattern: pattern.into(),
            match_type: MatchType::Contains,
            confidence: None,
        }
    }

    /// Create a `regex` pattern
    pub fn regex(
        id: impl Into<PatternId>,
        category_id: impl Into<CategoryId>,
        pattern: impl Into<String>,
    ) -> Self {
        Self {
            match_type: MatchType::Regex,
            ..Self::contains(id, category_id, pattern)
        }
    }

    /// Builder-style setter for the confidence
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Implicit `contains` patterns built from a category's keywords
    pub fn from_keywords(category: &Category, confidence: f64) -> Vec<Self> {
        category
            .keywords
            .iter()
            .filter(|k| !k.trim().is_empty())
            .map(|keyword| {
                Self::contains(
                    format!("kw:{}:{}", category.id, keyword.trim()),
                    category.id.clone(),
                    keyword.trim(),
                )
                .with_confidence(confidence)
            })
            .collect()
    }
}

/// Flat id → category mapping
#[derive(Debug, Clone, Default)]
pub struct CategoryDirectory {
    categories: HashMap<CategoryId, Category>,
    order: Vec<CategoryId>,
}

impl CategoryDirectory {
    /// Build a directory; a later duplicate id replaces the earlier record
    pub fn new<'a>(categories: impl IntoIterator<Item = &'a Category>) -> Self {
        let mut directory = Self::default();
        for category in categories {
            if directory
                .categories
                .insert(category.id.clone(), category.clone())
                .is_none()
            {
                directory.order.push(category.id.clone());
            }
        }
        directory
    }

    pub fn get(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.get(id)
    }

    pub fn contains(&self, id: &CategoryId) -> bool {
        self.categories.contains_key(id)
    }

    /// Type of a category, if it is known
    pub fn kind_of(&self, id: &CategoryId) -> Option<TransactionType> {
        self.get(id).map(|c| c.kind)
    }

    /// Display name of a category, if it is known
    pub fn name_of(&self, id: &CategoryId) -> Option<&str> {
        self.get(id).map(|c| c.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Categories in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.order.iter().filter_map(|id| self.categories.get(id))
    }

    /// Walk parent links upward from `id`
    ///
    /// Returns the ancestors nearest first. The walk stops at a parent that
    /// is not in the directory, or at the first repeated node, in which case
    /// the second element is true.
    pub fn ancestors(&self, id: &CategoryId) -> (Vec<CategoryId>, bool) {
        let mut ancestors = Vec::new();
        let mut seen: HashSet<&CategoryId> = HashSet::new();
        seen.insert(id);

        let mut current = self.get(id).and_then(|c| c.parent_id.as_ref());
        while let Some(parent) = current {
            if !seen.insert(parent) {
                return (ancestors, true);
            }
            if !self.contains(parent) {
                break;
            }
            ancestors.push(parent.clone());
            current = self.get(parent).and_then(|c| c.parent_id.as_ref());
        }

        (ancestors, false)
    }
}
