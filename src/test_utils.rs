//! Helpers shared by the endpoint tests.

use axum_test::TestServer;
use serde_json::Value;
use tempfile::TempDir;

use crate::{
    AppState, Error, ReceiptAnalyzer, build_router,
    store::{FlatFileStore, initialize},
};

/// Create a seeded flat-file store over a fresh temporary directory.
pub(crate) fn get_test_store() -> (TempDir, FlatFileStore) {
    let data_dir = TempDir::new().expect("Could not create temporary directory");
    let store = FlatFileStore::new(data_dir.path());
    initialize(&store).expect("Could not initialize store");

    (data_dir, store)
}

/// A scripted receipt analyzer so endpoint tests never touch the network.
#[derive(Debug, Clone)]
pub(crate) enum StubAnalyzer {
    /// Always succeeds with the given extracted fields.
    Success(Value),
    /// Always fails with the given message.
    Failure(String),
    /// Reports the byte length of the received image as the amount, so tests
    /// can observe what the analyzer was given.
    ImageSize,
}

impl ReceiptAnalyzer for StubAnalyzer {
    async fn analyze(&self, _api_key: &str, image: &[u8], _mime_type: &str) -> Result<Value, Error> {
        match self {
            StubAnalyzer::Success(fields) => Ok(fields.clone()),
            StubAnalyzer::Failure(message) => Err(Error::ReceiptAnalysis(message.clone())),
            StubAnalyzer::ImageSize => Ok(serde_json::json!({ "amount": image.len() })),
        }
    }
}

/// A test server backed by a temporary data directory.
pub(crate) struct TestApp {
    pub(crate) server: TestServer,
    pub(crate) state: AppState<StubAnalyzer>,
    _data_dir: TempDir,
}

/// Create a test app whose receipt analyzer always fails.
pub(crate) fn new_test_app() -> TestApp {
    new_test_app_with_analyzer(StubAnalyzer::Failure("stub analyzer".to_owned()))
}

/// Create a test app with the given scripted receipt analyzer.
pub(crate) fn new_test_app_with_analyzer(analyzer: StubAnalyzer) -> TestApp {
    let data_dir = TempDir::new().expect("Could not create temporary directory");
    let state =
        AppState::new(data_dir.path(), analyzer).expect("Could not initialize the app state");
    let server = TestServer::new(build_router(state.clone()));

    TestApp {
        server,
        state,
        _data_dir: data_dir,
    }
}
