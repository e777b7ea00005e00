//! CLI command handlers
//!
//! Bridges clap argument parsing with the engine services.

pub mod categorize;
pub mod report;

pub use categorize::{handle_categorize_command, CategorizeArgs, CategorizeFormat};
pub use report::{handle_report_command, ReportArgs, ReportFormat};
