//! Display formatting for terminal output

pub mod categorization;
pub mod report;

pub use categorization::format_categorizations;
