//! CLI command for the aggregate report

use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

use crate::config::Settings;
use crate::dataset::file_io::write_atomic;
use crate::dataset::Dataset;
use crate::error::{FintrackError, FintrackResult};
use crate::export::{export_csv, export_json, export_yaml};
use crate::models::transaction::parse_iso_date;
use crate::models::{AggregationConfig, CategoryDirectory, Month};
use crate::reports::{goals::format_goal_progress, rollup_to_parents, top_categories};
use crate::services::{analyze, Analysis};

/// Output formats for the report command
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
    Yaml,
    Csv,
}

/// Arguments of `fintrack report`
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Dataset file (.json, .yaml or .yml)
    pub dataset: PathBuf,

    /// First day of the window (YYYY-MM-DD)
    #[arg(short, long, required_unless_present = "month")]
    pub start: Option<String>,

    /// Last day of the window, inclusive (YYYY-MM-DD)
    #[arg(short, long, required_unless_present = "month")]
    pub end: Option<String>,

    /// Whole calendar month as the window (YYYY-MM), instead of --start/--end
    #[arg(short, long, conflicts_with_all = ["start", "end"])]
    pub month: Option<String>,

    /// Restrict to an account (repeatable)
    #[arg(short, long = "account")]
    pub accounts: Vec<String>,

    /// Restrict category and month totals to a category (repeatable)
    #[arg(short, long = "category")]
    pub categories: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Table)]
    pub format: ReportFormat,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Expand recurring projections into every period they recur in
    #[arg(long)]
    pub expand_projections: bool,

    /// Fold category totals into their parent categories
    #[arg(long)]
    pub rollup: bool,

    /// Show only the N largest categories (table format)
    #[arg(long)]
    pub top: Option<usize>,
}

fn parse_date_arg(value: &str, name: &str) -> FintrackResult<NaiveDate> {
    parse_iso_date(value).ok_or_else(|| {
        FintrackError::Validation(format!(
            "Invalid {} date: {}. Use YYYY-MM-DD",
            name, value
        ))
    })
}

impl ReportArgs {
    /// Build the per-call configuration from the arguments
    pub fn aggregation_config(&self) -> FintrackResult<AggregationConfig> {
        let (start, end) = match (&self.month, &self.start, &self.end) {
            (Some(month), _, _) => {
                let month = Month::parse(month).map_err(|e| FintrackError::Validation(e.to_string()))?;
                let window = crate::models::DateWindow::for_month(month)?;
                (window.start(), window.end())
            }
            (None, Some(start), Some(end)) => {
                (parse_date_arg(start, "start")?, parse_date_arg(end, "end")?)
            }
            _ => {
                return Err(FintrackError::Validation(
                    "Either --month or both --start and --end are required".into(),
                ))
            }
        };

        let mut config = AggregationConfig::new(start, end);
        if !self.accounts.is_empty() {
            config = config.with_accounts(self.accounts.iter().map(String::as_str));
        }
        if !self.categories.is_empty() {
            config = config.with_categories(self.categories.iter().map(String::as_str));
        }
        Ok(config)
    }
}

/// Handle `fintrack report`
pub fn handle_report_command(settings: &Settings, args: ReportArgs) -> FintrackResult<()> {
    let config = args.aggregation_config()?;
    let dataset = Dataset::load(&args.dataset)?;

    let mut options = settings.analysis_options();
    options.expand_projections |= args.expand_projections;

    let mut analysis = analyze(&dataset, &config, &options)?;

    if args.rollup {
        let directory = CategoryDirectory::new(&dataset.categories);
        let (rolled, warnings) = rollup_to_parents(&analysis.report.category_aggregates, &directory);
        analysis.report.category_aggregates = rolled;
        analysis.report.warnings.extend(warnings);
    }

    let rendered = render(&analysis, args.format, args.top, &settings.currency_symbol)?;

    match args.output {
        Some(path) => {
            write_atomic(&path, &rendered)?;
            println!("Report written to: {}", path.display());
        }
        None => print!("{}", String::from_utf8_lossy(&rendered)),
    }

    Ok(())
}

fn render(
    analysis: &Analysis,
    format: ReportFormat,
    top: Option<usize>,
    symbol: &str,
) -> FintrackResult<Vec<u8>> {
    let mut buffer = Vec::new();
    match format {
        ReportFormat::Table => {
            let mut text = match top {
                Some(n) => format_top(analysis, n, symbol),
                None => analysis.report.format_terminal(symbol),
            };
            if !analysis.goals.is_empty() {
                text.push('\n');
                text.push_str(&format_goal_progress(&analysis.goals, symbol));
            }
            buffer.extend_from_slice(text.as_bytes());
        }
        ReportFormat::Json => export_json(analysis, &mut buffer)?,
        ReportFormat::Yaml => export_yaml(analysis, &mut buffer)?,
        ReportFormat::Csv => export_csv(analysis, &mut buffer)?,
    }
    Ok(buffer)
}

fn format_top(analysis: &Analysis, n: usize, symbol: &str) -> String {
    let report = &analysis.report;
    let mut output = format!("Top {} Categories: {}\n\n", n, report.window);
    output.push_str(&format!("{:<35} {:>12} {:>8}\n", "Category", "Actual", "%"));
    output.push_str(&"-".repeat(58));
    output.push('\n');

    for aggregate in top_categories(&report.category_aggregates, n) {
        output.push_str(&format!(
            "{:<35} {:>12} {:>7.1}%\n",
            aggregate.label(),
            aggregate.actual_amount.format_with_symbol(symbol),
            aggregate.percentage * 100.0
        ));
    }
    output.push_str(&format!(
        "\nTotal categorized: {}\n",
        report.categorized_actual_total().format_with_symbol(symbol)
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ReportArgs,
    }

    fn parse(argv: &[&str]) -> ReportArgs {
        TestCli::parse_from(std::iter::once("fintrack").chain(argv.iter().copied())).args
    }

    #[test]
    fn test_window_from_dates() {
        let args = parse(&["data.json", "--start", "2025-12-01", "--end", "2025-12-31"]);
        let config = args.aggregation_config().unwrap();
        assert_eq!(config.window_start, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert!(config.account_scope.is_none());
        assert!(config.category_scope.is_none());
    }

    #[test]
    fn test_window_from_month() {
        let args = parse(&["data.json", "--month", "2024-02"]);
        let config = args.aggregation_config().unwrap();
        assert_eq!(config.window_end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_scopes_and_format() {
        let args = parse(&[
            "data.json",
            "--month",
            "2025-12",
            "--account",
            "acc_1",
            "--account",
            "acc_2",
            "--category",
            "rent",
            "--format",
            "csv",
        ]);
        assert_eq!(args.format, ReportFormat::Csv);
        let config = args.aggregation_config().unwrap();
        assert_eq!(config.account_scope.map(|s| s.len()), Some(2));
        assert_eq!(config.category_scope.map(|s| s.len()), Some(1));
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let args = parse(&["data.json", "--start", "12/01/2025", "--end", "2025-12-31"]);
        assert!(args.aggregation_config().unwrap_err().is_validation());
    }
}
