//! Spending totals over the configurable budgeting month.

use serde::Serialize;
use time::Date;

use crate::{
    calendar::{date_clamped, next_month, previous_month},
    transaction::Transaction,
};

/// A half-open date window: `start` is included, `end` is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthWindow {
    /// The first day inside the window.
    pub start: Date,
    /// The first day past the window.
    pub end: Date,
}

/// Total spending per category across all transactions, expenses only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    /// The category name. Transactions without one are pooled under
    /// "Uncategorized".
    pub category: String,
    /// Total spent in this category.
    pub total: f64,
}

/// The spending summary for the budgeting month containing `today`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Net spending (expenses minus income) dated exactly today.
    pub today: f64,
    /// Net spending within the budgeting month.
    pub month: f64,
    /// Net spending across every stored transaction.
    pub net: f64,
    /// The budgeting-month window the `month` figure covers.
    pub month_window: MonthWindow,
    /// All-time per-category expense totals, largest first.
    pub categories: Vec<CategoryTotal>,
}

/// The budgeting month containing `today` for a month that starts on
/// `start_day` (1 to 31).
///
/// The anchor day is clamped to the length of short months, so a start day
/// of 31 yields windows such as `[2024-02-29, 2024-03-31)`. When today falls
/// before this month's anchor, the window is the one that began last month.
pub fn month_window(today: Date, start_day: u8) -> MonthWindow {
    let anchor = date_clamped(today.year(), today.month(), start_day);

    let start = if anchor > today {
        let (year, month) = previous_month(today.year(), today.month());
        date_clamped(year, month, start_day)
    } else {
        anchor
    };

    let (year, month) = next_month(start.year(), start.month());

    MonthWindow {
        start,
        end: date_clamped(year, month, start_day),
    }
}

/// Summarize `transactions` for the budgeting month containing `today`.
pub fn summarize(transactions: &[Transaction], today: Date, start_day: u8) -> Summary {
    let month_window = month_window(today, start_day);

    let mut today_total = 0.0;
    let mut month_total = 0.0;
    let mut net = 0.0;
    let mut categories: Vec<CategoryTotal> = Vec::new();

    for transaction in transactions {
        let signed = if transaction.is_income {
            -transaction.amount
        } else {
            transaction.amount
        };

        net += signed;

        if transaction.date == today {
            today_total += signed;
        }

        if transaction.date >= month_window.start && transaction.date < month_window.end {
            month_total += signed;
        }

        if !transaction.is_income {
            let category = transaction.category.as_deref().unwrap_or("Uncategorized");

            match categories.iter_mut().find(|c| c.category == category) {
                Some(entry) => entry.total += transaction.amount,
                None => categories.push(CategoryTotal {
                    category: category.to_owned(),
                    total: transaction.amount,
                }),
            }
        }
    }

    categories.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });

    Summary {
        today: today_total,
        month: month_total,
        net,
        month_window,
        categories,
    }
}
