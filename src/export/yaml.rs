//! YAML export of analysis results

use std::io::Write;

use crate::error::{FintrackError, FintrackResult};
use crate::export::json::ReportExport;
use crate::services::Analysis;

/// Export an analysis as YAML with a short comment header
pub fn export_yaml<W: Write>(analysis: &Analysis, writer: &mut W) -> FintrackResult<()> {
    let export = ReportExport::new(analysis);
    let to_export_err = |e: std::io::Error| FintrackError::Export(e.to_string());

    writeln!(writer, "# fintrack report").map_err(to_export_err)?;
    writeln!(writer, "# Window: {}", analysis.report.window).map_err(to_export_err)?;
    writeln!(writer, "# Generated: {}", export.generated_at).map_err(to_export_err)?;
    writeln!(writer).map_err(to_export_err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| FintrackError::Export(e.to_string()))
}
