//! Endpoint for scanning an uploaded receipt image.

use std::path::{Path, PathBuf};

use axum::{Json, extract::Multipart, extract::State};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    AppState, Error,
    app_state::lock_store,
    receipt::{ReceiptAnalyzer, ScannedReceipt, normalize},
    settings::get_settings,
};

/// The largest receipt image accepted, in bytes.
pub const MAX_RECEIPT_BYTES: usize = 10 * 1024 * 1024;

/// A receipt image staged on disk for the duration of one scan, removed
/// when the scan finishes regardless of outcome.
struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    fn stage(uploads_dir: &Path, image: &[u8]) -> Result<Self, Error> {
        std::fs::create_dir_all(uploads_dir)?;

        let path = uploads_dir.join(Uuid::new_v4().to_string());
        std::fs::write(&path, image)?;

        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if let Err(error) = std::fs::remove_file(&self.path) {
            tracing::warn!("could not remove staged receipt {:?}: {error}", self.path);
        }
    }
}

/// Extract the fields of an uploaded receipt image.
///
/// Expects a multipart body with a `receipt` file field. The image is staged
/// on disk under the uploads directory and the analyzer is fed the staged
/// copy; the analyzer's output is normalized before it is returned.
pub async fn scan_receipt_endpoint<A>(
    State(state): State<AppState<A>>,
    mut multipart: Multipart,
) -> Result<Json<ScannedReceipt>, Error>
where
    A: ReceiptAnalyzer + Clone + Send + Sync,
{
    let mut image = None;
    let mut mime_type = "image/jpeg".to_owned();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?
    {
        if field.name() == Some("receipt") {
            if let Some(content_type) = field.content_type() {
                mime_type = content_type.to_owned();
            }

            image = Some(
                field
                    .bytes()
                    .await
                    .map_err(|error| Error::MultipartError(error.to_string()))?,
            );
            break;
        }
    }

    let image = image.ok_or(Error::MissingReceiptImage)?;

    // The guard must not be held across the analyzer call.
    let api_key = {
        let store = lock_store(&state.store)?;
        get_settings(&store)?.gemini_api_key
    };

    if api_key.is_empty() {
        return Err(Error::ApiKeyMissing);
    }

    let staged = TempUpload::stage(&state.uploads_dir, &image)?;
    let staged_image = tokio::fs::read(staged.path()).await?;

    let fields = state
        .receipt_analyzer
        .analyze(&api_key, &staged_image, &mime_type)
        .await?;

    Ok(Json(normalize(&fields, OffsetDateTime::now_utc().date())))
}
