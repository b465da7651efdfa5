//! Endpoints serving the spending reports.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    app_state::{StoreState, lock_store},
    report::{
        items::{ItemStatistic, item_statistics},
        summary::{Summary, summarize},
    },
    settings::get_settings,
    transaction::{RecurringGroup, get_transactions, group_recurring},
};

/// Query parameters for the summary report.
///
/// Both parameters exist so a client (or a test) can pin the reference date
/// and the month start day instead of relying on the server clock and the
/// stored settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    /// The reference date to summarize around. Defaults to the current date.
    #[serde(default)]
    pub today: Option<Date>,
    /// The day the budgeting month starts on. Defaults to the stored
    /// settings value.
    #[serde(default)]
    pub start_date: Option<u8>,
}

/// Return the spending summary for the budgeting month containing today.
pub async fn get_summary_endpoint(
    State(state): State<StoreState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<Summary>, Error> {
    let store = lock_store(&state.store)?;
    let transactions = get_transactions(&store)?;

    let start_day = match query.start_date {
        Some(start_day) if (1..=31).contains(&start_day) => start_day,
        Some(start_day) => return Err(Error::InvalidStartDate(start_day)),
        None => get_settings(&store)?.start_date,
    };
    let today = query
        .today
        .unwrap_or_else(|| OffsetDateTime::now_utc().date());

    Ok(Json(summarize(&transactions, today, start_day)))
}

/// Return per-item purchase statistics across all transactions.
pub async fn get_item_statistics_endpoint(
    State(state): State<StoreState>,
) -> Result<Json<Vec<ItemStatistic>>, Error> {
    let store = lock_store(&state.store)?;
    let transactions = get_transactions(&store)?;

    Ok(Json(item_statistics(&transactions)))
}

/// Return the stored recurring transactions grouped into their series.
pub async fn get_recurring_groups_endpoint(
    State(state): State<StoreState>,
) -> Result<Json<Vec<RecurringGroup>>, Error> {
    let store = lock_store(&state.store)?;
    let transactions = get_transactions(&store)?;

    Ok(Json(group_recurring(&transactions)))
}

#[cfg(test)]
mod report_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{endpoints, test_utils::new_test_app};

    #[tokio::test]
    async fn summary_honors_the_pinned_date_and_start_day() {
        let app = new_test_app();

        app.server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "category": "Groceries",
                "amount": 25.0,
                "date": "2024-03-01",
            }))
            .await
            .assert_status_ok();
        app.server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "category": "Rent",
                "amount": 800.0,
                "date": "2024-02-14",
            }))
            .await
            .assert_status_ok();

        let response = app
            .server
            .get(endpoints::SUMMARY)
            .add_query_param("today", "2024-03-10")
            .add_query_param("startDate", "15")
            .await;

        response.assert_status_ok();
        let summary: Value = response.json();
        assert_eq!(summary["month"], json!(25.0));
        assert_eq!(summary["net"], json!(825.0));
        assert_eq!(summary["monthWindow"]["start"], json!("2024-02-15"));
        assert_eq!(summary["monthWindow"]["end"], json!("2024-03-15"));
    }

    #[tokio::test]
    async fn summary_rejects_an_out_of_range_start_day() {
        let app = new_test_app();

        let response = app
            .server
            .get(endpoints::SUMMARY)
            .add_query_param("startDate", "0")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn item_statistics_merge_across_transactions() {
        let app = new_test_app();

        app.server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "amount": 4.0,
                "date": "2024-05-01",
                "items": [{"name": "Milk", "price": 2.0}, {"name": "Bread", "price": 2.0}],
            }))
            .await
            .assert_status_ok();
        app.server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "amount": 3.0,
                "date": "2024-05-10",
                "items": [{"name": " milk ", "price": 3.0}],
            }))
            .await
            .assert_status_ok();

        let statistics: Value = app.server.get(endpoints::ITEMS).await.json();

        assert_eq!(statistics[0]["name"], json!("milk"));
        assert_eq!(statistics[0]["count"], json!(2));
        assert_eq!(statistics[0]["totalSpent"], json!(5.0));
        assert_eq!(statistics[0]["lastPurchased"], json!("2024-05-10"));
    }

    #[tokio::test]
    async fn recurring_report_groups_generated_instances() {
        let app = new_test_app();

        app.server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "place": "Gym",
                "amount": 29.99,
                "date": "2024-01-01",
                "isRecurring": true,
                "recurringFrequency": "weekly",
                "recurringEndDate": "2024-01-22",
            }))
            .await
            .assert_status_ok();

        let groups: Value = app.server.get(endpoints::RECURRING).await.json();

        assert_eq!(groups.as_array().map(Vec::len), Some(1));
        assert_eq!(groups[0]["place"], json!("Gym"));
        assert_eq!(groups[0]["occurrences"], json!(4));
        assert_eq!(groups[0]["latestDate"], json!("2024-01-22"));
    }
}
