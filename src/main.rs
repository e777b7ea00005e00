use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fintrack::cli::{handle_categorize_command, handle_report_command, CategorizeArgs, ReportArgs};
use fintrack::config::{paths::FintrackPaths, settings::Settings};

#[derive(Parser)]
#[command(
    name = "fintrack",
    author = "Kaylee Beyene",
    version,
    about = "Categorize and aggregate personal finance transactions",
    long_about = "fintrack reads accounts, transactions, categories and matching \
                  patterns from a dataset file, assigns categories to uncategorized \
                  transactions and summarizes them per account, category and month."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Categorize and aggregate a dataset over a date window
    Report(ReportArgs),

    /// Show which category each uncategorized transaction would get
    Categorize(CategorizeArgs),

    /// Write default settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = FintrackPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings.log_filter);

    match cli.command {
        Some(Commands::Report(args)) => handle_report_command(&settings, args)?,
        Some(Commands::Categorize(args)) => handle_categorize_command(&settings, args)?,
        Some(Commands::Init) => {
            if paths.is_initialized() {
                println!("Settings already exist at: {}", paths.settings_file().display());
            } else {
                settings.save(&paths)?;
                println!("Settings written to: {}", paths.settings_file().display());
            }
        }
        Some(Commands::Config) => {
            println!("fintrack Configuration");
            println!("======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Reports directory: {}", paths.reports_dir().display());
            println!();
            println!("Settings:");
            println!("  Default confidence:     {}", settings.default_confidence);
            println!("  Case-insensitive regex: {}", settings.regex_case_insensitive);
            println!("  Category keywords:      {}", settings.use_category_keywords);
            println!("  Keyword confidence:     {}", settings.keyword_confidence);
            println!("  Expand projections:     {}", settings.expand_projections);
            println!("  Currency symbol:        {}", settings.currency_symbol);
            println!("  Log filter:             {}", settings.log_filter);
        }
        None => {
            println!("fintrack - personal finance aggregation");
            println!();
            println!("Run 'fintrack --help' for usage information.");
        }
    }

    Ok(())
}
