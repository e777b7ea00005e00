//! Pattern-based categorization
//!
//! A `Categorizer` is compiled once from an ordered pattern list and is then
//! read-only: it can be shared across threads and applied to any number of
//! transactions.

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

use crate::error::EngineWarning;
use crate::models::{
    AnyTransaction, CategoryDirectory, CategoryId, CategoryPattern, MatchType, PatternId,
    Transaction, TransactionType,
};

/// Knobs for compiling a pattern set
#[derive(Debug, Clone, PartialEq)]
pub struct CategorizerOptions {
    /// Confidence of patterns that do not carry one
    pub default_confidence: f64,
    /// Compile regex patterns case-insensitively (`contains` always is)
    pub regex_case_insensitive: bool,
    /// Append implicit patterns built from category keywords
    pub use_category_keywords: bool,
    /// Confidence of keyword patterns
    pub keyword_confidence: f64,
}

impl Default for CategorizerOptions {
    fn default() -> Self {
        Self {
            default_confidence: 0.5,
            regex_case_insensitive: false,
            use_category_keywords: false,
            keyword_confidence: 0.3,
        }
    }
}

/// The winning pattern for a description
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternMatch {
    pub pattern_id: PatternId,
    pub category_id: CategoryId,
    pub confidence: f64,
}

/// What the categorizer did with one transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Categorization {
    pub transaction_id: String,
    pub description: String,
    /// Category the transaction carried before (absent or unknown)
    pub previous: Option<CategoryId>,
    /// None when no pattern matched and the transaction was left as is
    pub matched: Option<PatternMatch>,
}

#[derive(Debug)]
enum Matcher {
    /// Lowercased needle
    Contains(String),
    Regex(Regex),
}

impl Matcher {
    fn is_match(&self, description: &str, lowered: &str) -> bool {
        match self {
            Self::Contains(needle) => lowered.contains(needle.as_str()),
            Self::Regex(re) => re.is_match(description),
        }
    }
}

#[derive(Debug)]
struct CompiledPattern {
    id: PatternId,
    category_id: CategoryId,
    /// Type of the target category; None when the category is unknown
    kind: Option<TransactionType>,
    confidence: f64,
    matcher: Matcher,
}

impl CompiledPattern {
    fn compile(
        pattern: &CategoryPattern,
        categories: &CategoryDirectory,
        options: &CategorizerOptions,
    ) -> Result<Self, String> {
        if pattern.pattern.is_empty() {
            return Err("empty pattern".to_string());
        }

        let confidence = pattern.confidence.unwrap_or(options.default_confidence);
        if !(0.0..=1.0).contains(&confidence) {
            return Err(format!("confidence {} outside [0, 1]", confidence));
        }

        let matcher = match pattern.match_type {
            MatchType::Contains => Matcher::Contains(pattern.pattern.to_lowercase()),
            MatchType::Regex => {
                let re = RegexBuilder::new(&pattern.pattern)
                    .case_insensitive(options.regex_case_insensitive)
                    .build()
                    .map_err(|e| e.to_string())?;
                Matcher::Regex(re)
            }
        };

        Ok(Self {
            id: pattern.id.clone(),
            category_id: pattern.category_id.clone(),
            kind: categories.kind_of(&pattern.category_id),
            confidence,
            matcher,
        })
    }

    fn applies_to(&self, kind: TransactionType) -> bool {
        self.kind.map_or(true, |k| k == kind)
    }
}

/// A compiled, ordered pattern set
#[derive(Debug, Default)]
pub struct Categorizer {
    patterns: Vec<CompiledPattern>,
    known_categories: HashSet<CategoryId>,
}

impl Categorizer {
    /// Compile `patterns` in priority order
    ///
    /// Patterns that cannot be used are skipped and reported; compilation
    /// itself never fails.
    pub fn new(
        patterns: &[CategoryPattern],
        categories: &CategoryDirectory,
        options: &CategorizerOptions,
    ) -> (Self, Vec<EngineWarning>) {
        let mut candidates: Vec<CategoryPattern> = patterns.to_vec();
        if options.use_category_keywords {
            for category in categories.iter() {
                candidates.extend(CategoryPattern::from_keywords(
                    category,
                    options.keyword_confidence,
                ));
            }
        }

        let mut compiled = Vec::with_capacity(candidates.len());
        let mut warnings = Vec::new();
        for pattern in &candidates {
            match CompiledPattern::compile(pattern, categories, options) {
                Ok(p) => compiled.push(p),
                Err(reason) => {
                    let warning = EngineWarning::malformed_pattern(pattern.id.as_str(), reason);
                    warning.emit();
                    warnings.push(warning);
                }
            }
        }

        debug!(
            patterns = compiled.len(),
            skipped = warnings.len(),
            "compiled category patterns"
        );

        let categorizer = Self {
            patterns: compiled,
            known_categories: categories.iter().map(|c| c.id.clone()).collect(),
        };
        (categorizer, warnings)
    }

    /// Number of usable patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Find the best pattern for a description
    ///
    /// Only patterns whose category type equals `kind` take part. The highest
    /// confidence wins; on a tie the earliest pattern wins.
    pub fn match_description(&self, description: &str, kind: TransactionType) -> Option<PatternMatch> {
        let lowered = description.to_lowercase();
        let mut best: Option<&CompiledPattern> = None;

        for pattern in self.patterns.iter().filter(|p| p.applies_to(kind)) {
            if !pattern.matcher.is_match(description, &lowered) {
                continue;
            }
            if best.map_or(true, |b| pattern.confidence > b.confidence) {
                best = Some(pattern);
            }
        }

        best.map(|p| PatternMatch {
            pattern_id: p.id.clone(),
            category_id: p.category_id.clone(),
            confidence: p.confidence,
        })
    }

    /// Check whether a transaction lacks a usable category
    ///
    /// A category counts as unknown only when a category directory was
    /// supplied and the id is missing from it.
    pub fn needs_category(&self, txn: &Transaction) -> bool {
        match &txn.category {
            None => true,
            Some(id) => !self.known_categories.is_empty() && !self.known_categories.contains(id),
        }
    }

    /// Categorize one transaction in place
    ///
    /// Returns None when the transaction already had a known category.
    /// Unmatched transactions keep their original value.
    pub fn categorize(&self, txn: &mut AnyTransaction) -> Option<Categorization> {
        let details = txn.details_mut();
        if !self.needs_category(details) {
            return None;
        }

        let matched = self.match_description(&details.description, details.kind);
        let previous = details.category.clone();
        if let Some(m) = &matched {
            debug!(
                transaction = %details.id,
                pattern = %m.pattern_id,
                category = %m.category_id,
                "categorized transaction"
            );
            details.category = Some(m.category_id.clone());
        }

        Some(Categorization {
            transaction_id: details.id.to_string(),
            description: details.description.clone(),
            previous,
            matched,
        })
    }

    /// Categorize every transaction lacking a usable category
    pub fn categorize_all(&self, transactions: &mut [AnyTransaction]) -> Vec<Categorization> {
        transactions
            .iter_mut()
            .filter_map(|txn| self.categorize(txn))
            .collect()
    }
}
