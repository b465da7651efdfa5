//! Endpoint for creating transactions, expanding recurring payloads into
//! their concrete instances.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    app_state::{StoreState, lock_store},
    transaction::{
        db::insert_transactions,
        models::{NewTransaction, Transaction},
        recurrence::expand_recurring,
    },
};

/// The response body for a recurring create: every generated instance plus
/// the count, persisted together in one write.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecurringCreated {
    /// How many instances were generated.
    pub created: usize,
    /// The generated instances, in date order.
    pub transactions: Vec<Transaction>,
}

/// Handle a transaction creation request.
///
/// The payload is validated before anything is written. Recurring payloads
/// are expanded into dated instances and respond with a [RecurringCreated];
/// one-off payloads respond with the created [Transaction].
pub async fn create_transaction_endpoint(
    State(state): State<StoreState>,
    Json(payload): Json<NewTransaction>,
) -> Result<Response, Error> {
    payload.validate()?;

    let created_at = OffsetDateTime::now_utc();
    let store = lock_store(&state.store)?;

    if payload.is_recurring {
        let instances = expand_recurring(&payload, created_at)?;
        insert_transactions(&store, &instances)?;

        tracing::info!("created {} recurring transaction instances", instances.len());

        Ok(Json(RecurringCreated {
            created: instances.len(),
            transactions: instances,
        })
        .into_response())
    } else {
        let transaction = payload.into_transaction_on(payload.date, created_at);
        insert_transactions(&store, std::slice::from_ref(&transaction))?;

        Ok(Json(transaction).into_response())
    }
}
