//! Expands a recurring transaction payload into concrete dated instances.

use time::{Date, Duration, OffsetDateTime};

use crate::{
    Error,
    calendar::{date_clamped, next_month},
    transaction::models::{Frequency, NewTransaction, Transaction},
};

/// The maximum number of instances generated for a series with no end date,
/// or an end date far in the future.
pub const MAX_INSTANCES: usize = 365;

/// Expand a recurring payload into transactions, one per occurrence date.
///
/// Each instance receives a freshly generated ID and the supplied creation
/// timestamp; the payload's end date is consumed here and not carried onto
/// the instances.
///
/// # Errors
/// Returns [Error::MissingFrequency] if the payload has no frequency.
pub fn expand_recurring(
    payload: &NewTransaction,
    created_at: OffsetDateTime,
) -> Result<Vec<Transaction>, Error> {
    let frequency = payload.recurring_frequency.ok_or(Error::MissingFrequency)?;

    let instances = occurrence_dates(payload.date, frequency, payload.recurring_end_date)
        .into_iter()
        .map(|date| payload.into_transaction_on(date, created_at))
        .collect();

    Ok(instances)
}

/// The ordered occurrence dates for a series starting at `start`.
///
/// The sequence steps by `frequency` and stops once the next date would pass
/// `end_date`, or at [MAX_INSTANCES] occurrences when no end date bounds the
/// series. An end date before `start` yields exactly the start date.
pub fn occurrence_dates(start: Date, frequency: Frequency, end_date: Option<Date>) -> Vec<Date> {
    if let Some(end) = end_date
        && end < start
    {
        return vec![start];
    }

    // Monthly steps re-anchor on the start day-of-month so a series started
    // on the 31st lands on the 31st again after a short month.
    let anchor_day = start.day();

    let mut dates = Vec::new();
    let mut current = start;

    while dates.len() < MAX_INSTANCES {
        dates.push(current);

        let next = next_occurrence(current, frequency, anchor_day);
        if let Some(end) = end_date
            && next > end
        {
            break;
        }

        current = next;
    }

    dates
}

fn next_occurrence(date: Date, frequency: Frequency, anchor_day: u8) -> Date {
    match frequency {
        Frequency::Daily => date + Duration::days(1),
        Frequency::Weekly => date + Duration::days(7),
        Frequency::Monthly => {
            let (year, month) = next_month(date.year(), date.month());
            date_clamped(year, month, anchor_day)
        }
        Frequency::Yearly => date_clamped(date.year() + 1, date.month(), anchor_day),
    }
}


#[cfg(test)]
mod expand_recurring_tests {
    use std::collections::HashSet;

    use time::macros::{date, datetime};

    use crate::{
        Error,
        transaction::models::{Frequency, NewTransaction},
        transaction::recurrence::expand_recurring,
    };

    fn recurring_payload() -> NewTransaction {
        NewTransaction {
            place: Some("Gym".to_owned()),
            category: Some("Health".to_owned()),
            amount: 29.99,
            is_income: false,
            date: date!(2024 - 01 - 01),
            items: Vec::new(),
            notes: None,
            is_recurring: true,
            recurring_frequency: Some(Frequency::Weekly),
            recurring_end_date: Some(date!(2024 - 01 - 22)),
        }
    }

    #[test]
    fn instances_get_unique_ids_and_shared_timestamp() {
        let created_at = datetime!(2024-01-01 08:30 UTC);

        let instances = expand_recurring(&recurring_payload(), created_at).unwrap();

        assert_eq!(instances.len(), 4);
        let ids: HashSet<_> = instances.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids.len(), instances.len());
        assert!(instances.iter().all(|t| t.created_at == created_at));
        assert!(instances.iter().all(|t| t.is_recurring));
        assert!(
            instances
                .iter()
                .all(|t| t.recurring_frequency == Some(Frequency::Weekly))
        );
    }

    #[test]
    fn missing_frequency_is_an_error() {
        let payload = NewTransaction {
            recurring_frequency: None,
            ..recurring_payload()
        };

        let result = expand_recurring(&payload, datetime!(2024-01-01 08:30 UTC));

        assert_eq!(result, Err(Error::MissingFrequency));
    }
}
