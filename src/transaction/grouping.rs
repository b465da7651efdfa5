//! Groups persisted recurring instances into their series for display.

use serde::Serialize;
use time::Date;

use crate::transaction::models::{Frequency, Transaction};

/// One recurring series, reconstructed from its persisted instances.
///
/// This is a display convenience, not a stored entity: instances are grouped
/// by their (place, category, amount, frequency) tuple.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringGroup {
    /// Where the money is spent or earned.
    pub place: Option<String>,
    /// The category shared by the instances.
    pub category: Option<String>,
    /// The per-occurrence amount.
    pub amount: f64,
    /// Whether the series is income rather than an expense.
    pub is_income: bool,
    /// How often the series repeats.
    pub frequency: Frequency,
    /// How many instances have been persisted.
    pub occurrences: u32,
    /// The date of the latest persisted instance.
    pub latest_date: Date,
}

/// Group the recurring instances in `transactions` by series.
///
/// Groups are returned in first-seen order. Non-recurring transactions and
/// recurring rows without a frequency are skipped.
pub fn group_recurring(transactions: &[Transaction]) -> Vec<RecurringGroup> {
    let mut groups: Vec<RecurringGroup> = Vec::new();

    for transaction in transactions.iter().filter(|t| t.is_recurring) {
        let Some(frequency) = transaction.recurring_frequency else {
            continue;
        };

        let existing = groups.iter_mut().find(|group| {
            group.place == transaction.place
                && group.category == transaction.category
                && group.amount == transaction.amount
                && group.frequency == frequency
        });

        match existing {
            Some(group) => {
                group.occurrences += 1;
                if transaction.date > group.latest_date {
                    group.latest_date = transaction.date;
                }
            }
            None => groups.push(RecurringGroup {
                place: transaction.place.clone(),
                category: transaction.category.clone(),
                amount: transaction.amount,
                is_income: transaction.is_income,
                frequency,
                occurrences: 1,
                latest_date: transaction.date,
            }),
        }
    }

    groups
}
