//! Receipt scanning: an uploaded receipt photo is sent to an image-capable
//! model, and the extracted fields are normalized into a form the client can
//! prefill a transaction from.

use std::future::Future;

use serde_json::Value;

use crate::Error;

mod gemini;
mod normalize;
mod scan;

pub use gemini::GeminiAnalyzer;
pub use normalize::{ScannedAmount, ScannedReceipt, normalize};
pub use scan::{MAX_RECEIPT_BYTES, scan_receipt_endpoint};

/// Extracts receipt fields from an image.
///
/// The app state is generic over this trait so tests can swap the real
/// Gemini-backed analyzer for a scripted one.
pub trait ReceiptAnalyzer {
    /// Analyze `image` and return the extracted fields as loose JSON.
    ///
    /// The returned value is not trusted: it is passed through
    /// [normalize] before reaching a client.
    fn analyze(
        &self,
        api_key: &str,
        image: &[u8],
        mime_type: &str,
    ) -> impl Future<Output = Result<Value, Error>> + Send;
}
