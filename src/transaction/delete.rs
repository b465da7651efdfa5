//! Endpoint for deleting a transaction.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    Error,
    app_state::{StoreState, lock_store},
    transaction::{db::delete_transaction, models::TransactionId},
};

/// Remove the transaction with `transaction_id` from the store.
pub async fn delete_transaction_endpoint(
    State(state): State<StoreState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<StatusCode, Error> {
    let store = lock_store(&state.store)?;
    delete_transaction(&store, &transaction_id)?;

    Ok(StatusCode::NO_CONTENT)
}
