//! Export module for fintrack
//!
//! Renders analysis results for other tools:
//! - CSV: sectioned, spreadsheet-compatible
//! - JSON: machine-readable, schema-versioned
//! - YAML: human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_csv;
pub use json::{export_json, ReportExport, REPORT_SCHEMA_VERSION};
pub use yaml::export_yaml;
