//! End-to-end analysis of a dataset
//!
//! validate records → categorize → (optionally expand projections) →
//! aggregate → evaluate goals. Warnings from every stage end up in the
//! report, in stage order.

use serde::Serialize;
use tracing::debug;

use super::aggregator::Aggregator;
use super::categorizer::{Categorization, Categorizer, CategorizerOptions};
use super::projection::expand_projections;
use crate::dataset::Dataset;
use crate::error::{EngineWarning, FintrackResult};
use crate::models::{validate_accounts, validate_transactions, AggregationConfig, CategoryDirectory};
use crate::reports::{evaluate_goals, AggregateReport, GoalProgress};

/// Options for one analysis run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisOptions {
    pub categorizer: CategorizerOptions,
    /// Expand recurring projections into one occurrence per period
    pub expand_projections: bool,
}

/// Result of a full analysis run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub report: AggregateReport,
    pub goals: Vec<GoalProgress>,
    pub categorizations: Vec<Categorization>,
}

/// Run the whole pipeline over a dataset
///
/// Call-level problems are checked before any record is touched, so a
/// failing call produces nothing at all.
pub fn analyze(
    dataset: &Dataset,
    config: &AggregationConfig,
    options: &AnalysisOptions,
) -> FintrackResult<Analysis> {
    let window = config.validate()?;

    let (accounts, mut warnings) = validate_accounts(&dataset.accounts);
    let (mut transactions, transaction_warnings) = validate_transactions(&dataset.transactions);
    warnings.extend(transaction_warnings);

    let directory = CategoryDirectory::new(&dataset.categories);
    let (categorizer, pattern_warnings) =
        Categorizer::new(&dataset.patterns, &directory, &options.categorizer);
    warnings.extend(pattern_warnings);

    let categorizations = categorizer.categorize_all(&mut transactions);
    debug!(
        candidates = categorizations.len(),
        matched = categorizations.iter().filter(|c| c.matched.is_some()).count(),
        "categorization finished"
    );

    if options.expand_projections {
        transactions = expand_projections(transactions, &window);
    }

    let mut report = Aggregator::new(&directory).aggregate(&accounts, &transactions, config)?;
    warnings.append(&mut report.warnings);
    report.warnings = warnings;

    let goals = evaluate_goals(&dataset.goals, &report.account_summaries);

    Ok(Analysis {
        report,
        goals,
        categorizations,
    })
}

/// Categorize a dataset's transactions without aggregating
pub fn categorize_dataset(
    dataset: &Dataset,
    options: &CategorizerOptions,
) -> (Vec<Categorization>, Vec<EngineWarning>) {
    let (mut transactions, mut warnings) = validate_transactions(&dataset.transactions);
    let directory = CategoryDirectory::new(&dataset.categories);
    let (categorizer, pattern_warnings) = Categorizer::new(&dataset.patterns, &directory, options);
    warnings.extend(pattern_warnings);

    (categorizer.categorize_all(&mut transactions), warnings)
}
