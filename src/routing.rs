//! Defines the routes of the REST API and how each route is handled.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};

use crate::{
    AppState, Error,
    category::{create_category_endpoint, get_categories_endpoint},
    endpoints,
    receipt::{MAX_RECEIPT_BYTES, ReceiptAnalyzer, scan_receipt_endpoint},
    report::{get_item_statistics_endpoint, get_recurring_groups_endpoint, get_summary_endpoint},
    settings::{get_settings_endpoint, update_settings_endpoint},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transactions_endpoint,
        update_transaction_endpoint,
    },
};

/// Assemble the API router around `state`.
pub fn build_router<A>(state: AppState<A>) -> Router
where
    A: ReceiptAnalyzer + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(update_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::CATEGORIES,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::SETTINGS,
            get(get_settings_endpoint).put(update_settings_endpoint),
        )
        .route(endpoints::SUMMARY, get(get_summary_endpoint))
        .route(endpoints::ITEMS, get(get_item_statistics_endpoint))
        .route(endpoints::RECURRING, get(get_recurring_groups_endpoint))
        .route(endpoints::SCAN_RECEIPT, post(scan_receipt_endpoint::<A>))
        .layer(DefaultBodyLimit::max(MAX_RECEIPT_BYTES))
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> Error {
    Error::NotFound
}

#[cfg(test)]
mod routing_tests {
    use axum::http::StatusCode;

    use crate::test_utils::new_test_app;

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let app = new_test_app();

        let response = app.server.get("/api/no-such-route").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
