//! Implements the structs that hold the state of the REST server.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard},
};

use axum::extract::FromRef;

use crate::{
    Error,
    receipt::ReceiptAnalyzer,
    store::{FlatFileStore, initialize},
};

/// The state of the REST server.
///
/// The server is generic over the receipt analyzer so tests can substitute a
/// stub for the external image-understanding API.
#[derive(Debug, Clone)]
pub struct AppState<A>
where
    A: ReceiptAnalyzer + Clone + Send + Sync,
{
    /// The flat-file document store holding the record collections.
    pub store: Arc<Mutex<FlatFileStore>>,
    /// The directory where uploaded receipt images are temporarily kept.
    pub uploads_dir: PathBuf,
    /// The client for the external receipt analysis API.
    pub receipt_analyzer: A,
}

impl<A> AppState<A>
where
    A: ReceiptAnalyzer + Clone + Send + Sync,
{
    /// Create a new [AppState] with a flat-file store under `data_dir`.
    ///
    /// This function seeds any missing data documents with their defaults.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be initialized.
    pub fn new(data_dir: impl Into<PathBuf>, receipt_analyzer: A) -> Result<Self, Error> {
        let store = FlatFileStore::new(data_dir);
        initialize(&store)?;

        let uploads_dir = store.data_dir().join("uploads");

        Ok(Self {
            store: Arc::new(Mutex::new(store)),
            uploads_dir,
            receipt_analyzer,
        })
    }
}

/// The state needed by handlers that only touch the document store.
#[derive(Debug, Clone)]
pub struct StoreState {
    /// The flat-file document store holding the record collections.
    pub store: Arc<Mutex<FlatFileStore>>,
}

impl<A> FromRef<AppState<A>> for StoreState
where
    A: ReceiptAnalyzer + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<A>) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// Acquire the store lock.
///
/// # Errors
/// Returns [Error::StoreLockError] if the lock has been poisoned.
pub(crate) fn lock_store(store: &Mutex<FlatFileStore>) -> Result<MutexGuard<'_, FlatFileStore>, Error> {
    store.lock().map_err(|error| {
        tracing::error!("could not acquire the store lock: {error}");
        Error::StoreLockError
    })
}
