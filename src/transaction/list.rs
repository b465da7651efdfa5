//! Endpoint for listing every stored transaction.

use axum::{Json, extract::State};

use crate::{
    Error,
    app_state::{StoreState, lock_store},
    transaction::{db::get_transactions, models::Transaction},
};

/// Return every stored transaction, recurring instances included, in the
/// order they were created.
pub async fn get_transactions_endpoint(
    State(state): State<StoreState>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let store = lock_store(&state.store)?;

    Ok(Json(get_transactions(&store)?))
}
