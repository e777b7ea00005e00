//! Aggregate output records for fintrack
//!
//! Account summaries, category aggregates, monthly aggregates and goal
//! progress, each with a terminal formatter.

pub mod account_summary;
pub mod aggregate;
pub mod category;
pub mod goals;
pub mod monthly;

pub use account_summary::AccountSummary;
pub use aggregate::{AggregateReport, UncategorizedTotals};
pub use category::{assign_percentages, rollup_to_parents, top_categories, CategoryAggregate};
pub use goals::{evaluate_goals, GoalProgress, ProgressSource};
pub use monthly::MonthlyAggregate;
