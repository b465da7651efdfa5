//! Spendlog is a web app for tracking personal expenses and income.
//!
//! This library provides a JSON REST API for recording transactions
//! (optionally recurring, optionally itemized), managing categories and
//! settings, computing spending reports, and populating a transaction from a
//! photographed receipt via an external image-understanding API.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod app_state;
mod calendar;
mod category;
mod endpoints;
mod receipt;
mod report;
mod routing;
mod settings;
mod store;
mod transaction;

#[cfg(test)]
pub(crate) mod test_utils;

pub use app_state::AppState;
pub use receipt::{GeminiAnalyzer, ReceiptAnalyzer};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A negative amount was used to create or update a transaction.
    ///
    /// Transaction amounts are magnitudes, the direction of the money flow is
    /// carried by the income flag.
    #[error("{0} is a negative amount, amounts must be zero or greater")]
    NegativeAmount(f64),

    /// A transaction item was given a negative price.
    #[error("item \"{name}\" has a negative price {price}")]
    NegativeItemPrice {
        /// The name of the offending item.
        name: String,
        /// The price that was rejected.
        price: f64,
    },

    /// A transaction was marked as recurring without a frequency.
    #[error("recurring transactions must specify a frequency")]
    MissingFrequency,

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// The month start day in the settings was outside the range 1-31.
    #[error("{0} is not a valid month start day, expected a value from 1 to 31")]
    InvalidStartDate(u8),

    /// Tried to update a transaction that does not exist.
    #[error("tried to update a transaction that is not in the store")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist.
    #[error("tried to delete a transaction that is not in the store")]
    DeleteMissingTransaction,

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The receipt scanning settings do not contain an API key.
    #[error("the receipt analysis API key has not been configured")]
    ApiKeyMissing,

    /// The multipart form did not contain a receipt image.
    #[error("no receipt image was uploaded")]
    MissingReceiptImage,

    /// The multipart form could not be parsed.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// The external receipt analysis call failed (network error, quota, or an
    /// error response), after exhausting the fallback model list.
    #[error("receipt analysis failed: {0}")]
    ReceiptAnalysis(String),

    /// The external receipt analysis call returned text that could not be
    /// parsed into structured fields.
    #[error("could not parse the receipt analysis response: {0}")]
    UnparseableResponse(String),

    /// Could not acquire the store lock.
    #[error("could not acquire the store lock")]
    StoreLockError,

    /// An error occurred while reading or writing a data file.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("data file I/O failed: {0}")]
    Io(String),

    /// A data file could not be serialized or deserialized as JSON.
    #[error("could not read or write JSON: {0}")]
    Json(String),
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::Json(value.to_string())
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::NegativeAmount(_)
            | Error::NegativeItemPrice { .. }
            | Error::MissingFrequency
            | Error::EmptyCategoryName
            | Error::InvalidStartDate(_)
            | Error::ApiKeyMissing
            | Error::MissingReceiptImage
            | Error::MultipartError(_) => StatusCode::BAD_REQUEST,
            Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction
            | Error::NotFound => StatusCode::NOT_FOUND,
            Error::ReceiptAnalysis(_) | Error::UnparseableResponse(_) => StatusCode::BAD_GATEWAY,
            Error::StoreLockError | Error::Io(_) | Error::Json(_) => {
                tracing::error!("An unexpected error occurred: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
