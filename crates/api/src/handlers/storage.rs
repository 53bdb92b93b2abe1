//! Public reads from the object store.

use axum::extract::{Path, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use filmcraft_core::storage::{content_type_for_key, SHOT_IMAGES_BUCKET};
use serde_json::json;

use crate::error::AppResult;
use crate::state::AppState;
use crate::storage::StorageError;

/// GET /storage/shot-images/{*key}
///
/// Serves stored shot images. The bucket is public, so no token is needed.
pub async fn get_shot_image(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<Response> {
    match state.object_store.get(SHOT_IMAGES_BUCKET, &key).await {
        Ok(bytes) => Ok((
            [
                (CONTENT_TYPE, content_type_for_key(&key)),
                (CACHE_CONTROL, "public, max-age=3600"),
            ],
            bytes,
        )
            .into_response()),
        Err(StorageError::NotFound(_)) => Ok((
            StatusCode::NOT_FOUND,
            axum::Json(json!({
                "error": format!("Object '{key}' not found"),
                "code": "NOT_FOUND",
            })),
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}
