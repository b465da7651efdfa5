//! Endpoint for updating an existing transaction with a partial payload.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    Error,
    app_state::{StoreState, lock_store},
    transaction::{
        db::update_transaction,
        models::{Transaction, TransactionId, TransactionPatch},
    },
};

/// Merge the supplied fields over the transaction with `transaction_id` and
/// respond with the updated record.
///
/// The ID and creation timestamp are never changed by an update.
pub async fn update_transaction_endpoint(
    State(state): State<StoreState>,
    Path(transaction_id): Path<TransactionId>,
    Json(patch): Json<TransactionPatch>,
) -> Result<Json<Transaction>, Error> {
    patch.validate()?;

    let store = lock_store(&state.store)?;
    let updated = update_transaction(&store, &transaction_id, &patch)?;

    Ok(Json(updated))
}
