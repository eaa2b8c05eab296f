//! Image upload and removal endpoints.

use crate::{
    api::AppState,
    core::image,
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Multipart, State},
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Multipart field carrying the uploaded file.
const FILE_FIELD: &str = "file";

/// Response of `POST /api/upload`.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Stored path relative to the public directory
    pub path: String,
}

/// Body of `POST /api/files/delete`.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteFileRequest {
    /// Path previously returned by an upload
    #[serde(default)]
    pub image_path: Option<String>,
}

/// Soft status of a file removal.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// `"ok"`, `"error"` for a missing file, or the failure text
    pub message: String,
}

/// `POST /api/upload` - stores the `file` field and returns where it was written.
#[instrument(skip(state, multipart))]
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    while let Some(field) = multipart.next_field().await.map_err(|e| Error::Upload {
        message: e.to_string(),
    })? {
        if field.name() != Some(FILE_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|e| Error::Upload {
            message: e.to_string(),
        })?;

        let path = image::store(&state.public_dir, &original_name, &bytes, Local::now()).await?;
        return Ok(Json(UploadResponse { path }));
    }

    Err(Error::Upload {
        message: format!("missing multipart field '{FILE_FIELD}'"),
    })
}

/// `POST /api/files/delete` - removes an uploaded file; succeeds with `"ok"` when no path is given.
#[instrument(skip(state))]
pub async fn delete_file(
    State(state): State<AppState>,
    Json(request): Json<DeleteFileRequest>,
) -> Json<MessageResponse> {
    let Some(path) = request.image_path.filter(|p| !p.is_empty()) else {
        return Json(MessageResponse {
            message: "ok".to_string(),
        });
    };

    let outcome = image::delete(&state.public_dir, &path).await;
    Json(MessageResponse {
        message: outcome.message().to_string(),
    })
}
