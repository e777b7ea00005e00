//! JSON export of analysis results, with schema versioning

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::error::{FintrackError, FintrackResult};
use crate::services::Analysis;

/// Current report schema version
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Wrapper around an analysis for machine consumption
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportExport<'a> {
    /// Schema version for compatibility checking
    pub schema_version: &'static str,
    pub generated_at: DateTime<Utc>,
    /// Application version that created the export
    pub app_version: &'static str,
    #[serde(flatten)]
    pub analysis: &'a Analysis,
}

impl<'a> ReportExport<'a> {
    pub fn new(analysis: &'a Analysis) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            generated_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION"),
            analysis,
        }
    }
}

/// Export an analysis as pretty-printed JSON
pub fn export_json<W: Write>(analysis: &Analysis, writer: &mut W) -> FintrackResult<()> {
    let export = ReportExport::new(analysis);
    serde_json::to_writer_pretty(&mut *writer, &export)
        .map_err(|e| FintrackError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| FintrackError::Export(e.to_string()))?;
    Ok(())
}
