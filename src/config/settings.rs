//! User settings for fintrack
//!
//! Settings only seed the options passed into each engine call; the engine
//! itself never reads them.

use serde::{Deserialize, Serialize};

use super::paths::FintrackPaths;
use crate::dataset::file_io::write_json_atomic;
use crate::error::{FintrackError, FintrackResult};
use crate::services::{AnalysisOptions, CategorizerOptions};

/// User settings for fintrack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Confidence of patterns that do not carry one
    #[serde(default = "default_confidence")]
    pub default_confidence: f64,

    /// Compile regex patterns case-insensitively
    #[serde(default)]
    pub regex_case_insensitive: bool,

    /// Turn category keywords into implicit patterns
    #[serde(default)]
    pub use_category_keywords: bool,

    /// Confidence of keyword patterns
    #[serde(default = "default_keyword_confidence")]
    pub keyword_confidence: f64,

    /// Expand recurring projections before aggregating
    #[serde(default)]
    pub expand_projections: bool,

    /// Currency symbol used in terminal output
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Log filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_confidence() -> f64 {
    0.5
}

fn default_keyword_confidence() -> f64 {
    0.3
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_confidence: default_confidence(),
            regex_case_insensitive: false,
            use_category_keywords: false,
            keyword_confidence: default_keyword_confidence(),
            expand_projections: false,
            currency_symbol: default_currency(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &FintrackPaths) -> FintrackResult<Self> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // not persisted until the caller decides to
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| FintrackError::Io(format!("Failed to read settings file: {}", e)))?;
        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| FintrackError::Config(format!("Failed to parse settings file: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FintrackPaths) -> FintrackResult<()> {
        self.validate()?;
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Reject confidences outside [0, 1]
    pub fn validate(&self) -> FintrackResult<()> {
        for (name, value) in [
            ("default_confidence", self.default_confidence),
            ("keyword_confidence", self.keyword_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(FintrackError::Config(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Options for compiling a categorizer
    pub fn categorizer_options(&self) -> CategorizerOptions {
        CategorizerOptions {
            default_confidence: self.default_confidence,
            regex_case_insensitive: self.regex_case_insensitive,
            use_category_keywords: self.use_category_keywords,
            keyword_confidence: self.keyword_confidence,
        }
    }

    /// Options for a full analysis run
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            categorizer: self.categorizer_options(),
            expand_projections: self.expand_projections,
        }
    }
}
