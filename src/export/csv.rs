//! CSV export of analysis results
//!
//! One file, four sections (accounts, categories, months, warnings). Every
//! row starts with its section name so the file can be filtered with a
//! spreadsheet or `grep`.

use std::io::Write;

use crate::error::{FintrackError, FintrackResult};
use crate::models::Money;
use crate::services::Analysis;

fn amount(money: Money) -> String {
    money.to_string()
}

/// Export an analysis as sectioned CSV
pub fn export_csv<W: Write>(analysis: &Analysis, writer: W) -> FintrackResult<()> {
    let report = &analysis.report;
    let mut csv = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    let to_export_err = |e: csv::Error| FintrackError::Export(e.to_string());

    csv.write_record([
        "section",
        "account_id",
        "account_name",
        "currency_id",
        "balance",
        "balance_derived",
        "total_income",
        "total_expense",
        "net",
        "transaction_count",
    ])
    .map_err(to_export_err)?;
    for summary in &report.account_summaries {
        csv.write_record([
            "account".to_string(),
            summary.account_id.to_string(),
            summary.account_name.clone(),
            summary.currency_id.to_string(),
            amount(summary.balance),
            summary.balance_derived.to_string(),
            amount(summary.total_income),
            amount(summary.total_expense),
            amount(summary.net),
            summary.transaction_count.to_string(),
        ])
        .map_err(to_export_err)?;
    }

    csv.write_record([
        "section",
        "category",
        "category_name",
        "category_type",
        "actual_amount",
        "projected_amount",
        "percentage",
        "transaction_count",
    ])
    .map_err(to_export_err)?;
    for aggregate in &report.category_aggregates {
        csv.write_record([
            "category".to_string(),
            aggregate.category_id.to_string(),
            aggregate.category_name.clone().unwrap_or_default(),
            aggregate
                .category_type
                .map(|k| k.to_string())
                .unwrap_or_default(),
            amount(aggregate.actual_amount),
            amount(aggregate.projected_amount),
            format!("{:.4}", aggregate.percentage),
            aggregate.transaction_count.to_string(),
        ])
        .map_err(to_export_err)?;
    }
    if !report.uncategorized.is_empty() {
        csv.write_record([
            "category".to_string(),
            String::new(),
            "UNCATEGORIZED".to_string(),
            String::new(),
            amount(report.uncategorized.actual_amount),
            amount(report.uncategorized.projected_amount),
            String::new(),
            report.uncategorized.transaction_count.to_string(),
        ])
        .map_err(to_export_err)?;
    }

    csv.write_record([
        "section",
        "month",
        "actual_income",
        "projected_income",
        "actual_expense",
        "projected_expense",
    ])
    .map_err(to_export_err)?;
    for month in &report.monthly_aggregates {
        csv.write_record([
            "month".to_string(),
            month.month.to_string(),
            amount(month.actual_income),
            amount(month.projected_income),
            amount(month.actual_expense),
            amount(month.projected_expense),
        ])
        .map_err(to_export_err)?;
    }

    csv.write_record(["section", "subject_id", "message"])
        .map_err(to_export_err)?;
    for warning in &report.warnings {
        csv.write_record([
            "warning".to_string(),
            warning.subject_id().to_string(),
            warning.to_string(),
        ])
        .map_err(to_export_err)?;
    }

    csv.flush()
        .map_err(|e| FintrackError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineWarning;
    use crate::export::json::tests::sample_analysis;

    #[test]
    fn test_export_csv_sections() {
        let mut analysis = sample_analysis();
        analysis
            .report
            .warnings
            .push(EngineWarning::malformed_record("txn_009", "missing field 'date'"));

        let mut buffer = Vec::new();
        export_csv(&analysis, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.starts_with("section,account_id,"));
        assert!(text.contains("month,2025-12,3000.00,0.00,50.00,0.00"));
        assert!(text.contains("warning,txn_009,"));
    }

    #[test]
    fn test_export_csv_quotes_commas() {
        let mut analysis = sample_analysis();
        analysis
            .report
            .warnings
            .push(EngineWarning::malformed_pattern("pat_x", "a, b"));

        let mut buffer = Vec::new();
        export_csv(&analysis, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("\"Pattern 'pat_x' skipped: a, b\""));
    }
}
