//! Categorization result formatting

use super::report::truncate;
use crate::services::Categorization;

/// Format a single categorization result as a table row
pub fn format_categorization_row(result: &Categorization) -> String {
    let (category, pattern, confidence) = match &result.matched {
        Some(m) => (
            m.category_id.to_string(),
            m.pattern_id.to_string(),
            format!("{:.2}", m.confidence),
        ),
        None => ("(uncategorized)".to_string(), "-".to_string(), "-".to_string()),
    };

    format!(
        "{:<16} {:<32} {:<18} {:<22} {:>5}",
        truncate(&result.transaction_id, 16),
        truncate(&result.description, 32),
        truncate(&category, 18),
        truncate(&pattern, 22),
        confidence
    )
}

/// Format categorization results as a table with a summary line
pub fn format_categorizations(results: &[Categorization]) -> String {
    if results.is_empty() {
        return "Every transaction already has a known category.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<16} {:<32} {:<18} {:<22} {:>5}\n",
        "Transaction", "Description", "Category", "Pattern", "Conf."
    ));
    output.push_str(&"-".repeat(97));
    output.push('\n');

    for result in results {
        output.push_str(&format_categorization_row(result));
        output.push('\n');
    }

    let matched = results.iter().filter(|r| r.matched.is_some()).count();
    output.push_str(&format!(
        "\n{} of {} transactions categorized\n",
        matched,
        results.len()
    ));

    output
}
