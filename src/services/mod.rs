//! Engine layer for fintrack
//!
//! The categorizer and aggregator are pure: they take every input
//! explicitly and perform no I/O. `analysis` chains them over a dataset.

pub mod aggregator;
pub mod analysis;
pub mod categorizer;
pub mod projection;

#[cfg(test)]
mod aggregator_props;

pub use aggregator::Aggregator;
pub use analysis::{analyze, categorize_dataset, Analysis, AnalysisOptions};
pub use categorizer::{Categorization, Categorizer, CategorizerOptions, PatternMatch};
pub use projection::{expand_projection, expand_projections};
