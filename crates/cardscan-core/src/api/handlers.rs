//! API request handlers.

use std::path::{Path, PathBuf};

use axum::{
    Json,
    extract::{Multipart, Query, State, rejection::QueryRejection},
};
use tracing::{debug, info};

use crate::error::CardscanError;
use crate::extract::ContactExtractor;
use crate::models::contact::{ContactFields, ContactRecord, NewContact};

use super::{
    error::ApiError,
    types::{ApiState, HealthResponse, ListQuery},
};

/// URL prefix uploaded images are served under.
pub(crate) const UPLOADS_PREFIX: &str = "/uploads";

/// A card image written to the upload directory.
struct SavedUpload {
    path: PathBuf,
    filename: String,
}

/// Upload endpoint handler.
///
/// POST /upload
///
/// Accepts multipart form data with a `file` field holding the card image.
/// The image is stored, recognized and parsed; the card is persisted with
/// `image = /uploads/<filename>` and the extracted fields are returned.
pub async fn upload_handler(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> Result<Json<ContactFields>, ApiError> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.to_string()))?;

        info!(
            "Received upload {:?} ({} bytes)",
            original_name.as_deref().unwrap_or("<unnamed>"),
            data.len()
        );

        let saved = save_upload(&state.config.storage.upload_dir, original_name.as_deref(), &data)
            .await
            .map_err(ApiError::process_failed)?;
        upload = Some(saved);
        break;
    }

    let upload = upload.ok_or_else(|| ApiError::bad_request("No file uploaded"))?;

    let engine = state.engine.clone();
    let store = state.store.clone();
    let parser = state.parser.clone();
    let language = state.config.ocr.language.clone();
    let image = format!("{}/{}", UPLOADS_PREFIX, upload.filename);

    let fields = tokio::task::spawn_blocking(move || -> crate::Result<ContactFields> {
        let ocr_result = engine.recognize(&upload.path, &language)?;
        debug!(
            "{} recognized {} characters",
            engine.name(),
            ocr_result.text.len()
        );

        let fields = parser.extract(&ocr_result);
        let record = store.insert(NewContact::new(fields.clone(), image))?;
        info!("Stored card {} ({})", record.id, record.image);

        Ok(fields)
    })
    .await
    .map_err(ApiError::process_failed)?
    .map_err(ApiError::process_failed)?;

    Ok(Json(fields))
}

/// Card listing endpoint handler.
///
/// GET /cards?page=&limit=
pub async fn list_cards_handler(
    State(state): State<ApiState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<ContactRecord>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let page = query.to_page(
        state.config.listing.default_limit,
        state.config.listing.max_limit,
    );

    let store = state.store.clone();
    let cards = tokio::task::spawn_blocking(move || store.list(page))
        .await
        .map_err(ApiError::list_failed)?
        .map_err(ApiError::list_failed)?;

    debug!("Returning {} cards for page {}", cards.len(), page.page);
    Ok(Json(cards))
}

/// Health check endpoint handler.
///
/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Write upload bytes under a generated name, keeping a plain extension.
async fn save_upload(
    upload_dir: &Path,
    original_name: Option<&str>,
    data: &[u8],
) -> Result<SavedUpload, CardscanError> {
    tokio::fs::create_dir_all(upload_dir).await?;

    let id = uuid::Uuid::new_v4().simple().to_string();
    let filename = match original_name.and_then(upload_extension) {
        Some(ext) => format!("{}.{}", id, ext),
        None => id,
    };

    let path = upload_dir.join(&filename);
    tokio::fs::write(&path, data).await?;
    debug!("Saved upload to {}", path.display());

    Ok(SavedUpload { path, filename })
}

/// Lowercased extension of a client file name, if it is short and alphanumeric.
fn upload_extension(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?;
    (!ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .then(|| ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_extension() {
        assert_eq!(upload_extension("card.JPG"), Some("jpg".to_string()));
        assert_eq!(upload_extension("scan.final.png"), Some("png".to_string()));
        assert_eq!(upload_extension("card"), None);
        assert_eq!(upload_extension("card.p/ng"), None);
        assert_eq!(upload_extension("card.verylongext"), None);
    }

    #[tokio::test]
    async fn test_save_upload() {
        let dir = tempfile::tempdir().unwrap();
        let upload_dir = dir.path().join("uploads");

        let saved = save_upload(&upload_dir, Some("me.png"), b"bytes").await.unwrap();

        assert!(saved.filename.ends_with(".png"));
        assert_eq!(saved.filename.len(), 32 + 4);
        assert_eq!(std::fs::read(&saved.path).unwrap(), b"bytes");
    }
}
