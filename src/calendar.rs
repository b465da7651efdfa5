//! Calendar date helpers shared by the recurrence expander and the reports.

use time::{Date, Month};

/// The number of days in `month` of `year`.
pub(crate) fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

/// The calendar month after `(year, month)`, rolling over into the next year.
pub(crate) fn next_month(year: i32, month: Month) -> (i32, Month) {
    match month {
        Month::December => (year + 1, Month::January),
        month => (year, month.next()),
    }
}

/// The calendar month before `(year, month)`, rolling back into the previous year.
pub(crate) fn previous_month(year: i32, month: Month) -> (i32, Month) {
    match month {
        Month::January => (year - 1, Month::December),
        month => (year, month.previous()),
    }
}

/// The date in `(year, month)` with day-of-month `day`, clamped to the length
/// of the month.
pub(crate) fn date_clamped(year: i32, month: Month, day: u8) -> Date {
    let day = day.min(last_day_of_month(year, month));

    Date::from_calendar_date(year, month, day).expect("day is clamped to the month length")
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
