//! CLI command for previewing categorization

use clap::{Args, ValueEnum};
use std::path::PathBuf;

use crate::config::Settings;
use crate::dataset::Dataset;
use crate::display::format_categorizations;
use crate::error::FintrackResult;
use crate::services::categorize_dataset;

/// Output formats for the categorize command
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorizeFormat {
    Table,
    Json,
}

/// Arguments of `fintrack categorize`
#[derive(Args, Debug)]
pub struct CategorizeArgs {
    /// Dataset file (.json, .yaml or .yml)
    pub dataset: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = CategorizeFormat::Table)]
    pub format: CategorizeFormat,

    /// Also use category keywords as patterns
    #[arg(long)]
    pub keywords: bool,
}

/// Handle `fintrack categorize`
pub fn handle_categorize_command(settings: &Settings, args: CategorizeArgs) -> FintrackResult<()> {
    let dataset = Dataset::load(&args.dataset)?;

    let mut options = settings.categorizer_options();
    options.use_category_keywords |= args.keywords;

    // warnings already went to stderr through tracing
    let (results, _warnings) = categorize_dataset(&dataset, &options);

    match args.format {
        CategorizeFormat::Table => print!("{}", format_categorizations(&results)),
        CategorizeFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
    }

    Ok(())
}
