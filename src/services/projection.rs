//! Expansion of recurring projections into dated occurrences
//!
//! The aggregator counts every projected instance exactly once. Callers that
//! want a recurring projection to show up in every month it recurs in expand
//! it here first.

use chrono::Months;

use crate::models::{AnyTransaction, DateWindow, Frequency, ProjectedTransaction};

/// Occurrences of `projected` that fall inside `window`
///
/// Steps are anchored on the original date, so a projection on the 31st
/// lands on the last day of shorter months without drifting. A projection
/// without a recurring frequency is returned unchanged.
pub fn expand_projection(
    projected: &ProjectedTransaction,
    window: &DateWindow,
) -> Vec<ProjectedTransaction> {
    let step = match projected.frequency.and_then(|f| f.step_months()) {
        Some(step) => step,
        None => return vec![projected.clone()],
    };

    let anchor = projected.transaction.date;
    let mut occurrences = Vec::new();

    for k in 0u32.. {
        let date = match k
            .checked_mul(step)
            .and_then(|months| anchor.checked_add_months(Months::new(months)))
        {
            Some(date) => date,
            None => break,
        };
        if date > window.end() {
            break;
        }
        if date < window.start() {
            continue;
        }

        let mut transaction = projected.transaction.clone();
        transaction.id = format!("{}@{}", projected.transaction.id, date).into();
        transaction.date = date;
        occurrences.push(ProjectedTransaction::new(transaction, Some(Frequency::Once)));
    }

    occurrences
}

/// Expand every recurring projection in a transaction list
///
/// Actual transactions pass through untouched.
pub fn expand_projections(
    transactions: Vec<AnyTransaction>,
    window: &DateWindow,
) -> Vec<AnyTransaction> {
    let mut expanded = Vec::with_capacity(transactions.len());
    for txn in transactions {
        match txn {
            AnyTransaction::Projected(projected) => expanded.extend(
                expand_projection(&projected, window)
                    .into_iter()
                    .map(AnyTransaction::Projected),
            ),
            actual @ AnyTransaction::Actual(_) => expanded.push(actual),
        }
    }
    expanded
}
