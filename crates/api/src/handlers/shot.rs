//! Handlers for the shot list and shot reference images.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use filmcraft_core::collaboration::Permission;
use filmcraft_core::error::{require_non_blank, CoreError};
use filmcraft_core::shots::{
    duplicate_order_index, duplicate_title, new_shot_defaults, overall_progress, priority_color,
    status_color, status_label, validate_shot_fields, ShotStatus,
};
use filmcraft_core::storage::{
    image_extension, is_attached_key, key_from_public_url, public_url, shot_image_key,
    validate_image_upload, SHOT_IMAGES_BUCKET,
};
use filmcraft_core::types::DbId;
use filmcraft_db::models::shot::{CreateShot, Shot, UpdateShot};
use filmcraft_db::repositories::{SceneRepo, ShotRepo};
use filmcraft_events::ChangeTable;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::publish_change;
use crate::middleware::access::authorize_project;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field carrying the image bytes.
const IMAGE_FIELD: &str = "file";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// A shot with display hints.
#[derive(Debug, Serialize)]
pub struct ShotView {
    #[serde(flatten)]
    pub shot: Shot,
    pub status_label: String,
    pub status_color: &'static str,
    pub priority_color: &'static str,
}

impl From<Shot> for ShotView {
    fn from(shot: Shot) -> Self {
        Self {
            status_label: status_label(&shot.status),
            status_color: status_color(&shot.status),
            priority_color: priority_color(&shot.priority),
            shot,
        }
    }
}

/// The project's shot list with overall completion.
#[derive(Debug, Serialize)]
pub struct ShotList {
    pub shots: Vec<ShotView>,
    pub progress: u8,
}

/// Request body for `POST /projects/{id}/shots`.
///
/// Only `scene_number` is required; everything else falls back to the
/// "add shot" defaults for that scene.
#[derive(Debug, Deserialize)]
pub struct CreateShotRequest {
    pub scene_number: i32,
    pub title: Option<String>,
    pub shot_type: Option<String>,
    pub camera_movement: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    pub order_index: Option<f64>,
}

/// An image stored before its shot exists.
#[derive(Debug, Serialize)]
pub struct UploadedImage {
    pub key: String,
    pub url: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn authorize_shot(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
    needed: Permission,
) -> AppResult<Shot> {
    let shot = ShotRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| gone(id))?;
    authorize_project(&state.pool, user, shot.project_id, needed).await?;
    Ok(shot)
}

fn gone(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Shot", id })
}

async fn set_status(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
    status: impl FnOnce(&Shot) -> AppResult<ShotStatus>,
) -> AppResult<Json<DataResponse<ShotView>>> {
    let shot = authorize_shot(state, user, id, Permission::Edit).await?;
    let next = status(&shot)?;
    let shot = ShotRepo::set_status(&state.pool, id, next.as_str())
        .await?
        .ok_or_else(|| gone(id))?;
    tracing::debug!(shot_id = id, status = next.as_str(), "Shot status changed");
    publish_change(state, shot.project_id, ChangeTable::Shots, user);
    Ok(Json(DataResponse { data: shot.into() }))
}

/// A validated image read from a multipart body.
struct ImageUpload {
    bytes: Vec<u8>,
    ext: String,
}

/// Read the `file` field, check its declared type and size, then sniff the
/// bytes to make sure they really are an image.
async fn read_image(mut multipart: Multipart, max_bytes: u64) -> AppResult<ImageUpload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;

        validate_image_upload(&content_type, bytes.len() as u64, max_bytes)?;
        image::guess_format(&bytes).map_err(|_| {
            AppError::Core(CoreError::Validation(
                "Uploaded file is not a supported image".into(),
            ))
        })?;

        return Ok(ImageUpload {
            ext: image_extension(file_name.as_deref(), &content_type),
            bytes: bytes.to_vec(),
        });
    }
    Err(AppError::BadRequest(format!(
        "Missing multipart field '{IMAGE_FIELD}'"
    )))
}

/// Delete the stored object behind a shot's image URL when the shot owns it:
/// either its attached key or an upload made before the shot existed that no
/// other shot points at. URLs outside our storage are left alone.
pub(crate) async fn delete_stored_image(state: &AppState, shot: &Shot) -> AppResult<()> {
    let Some(url) = shot.image_url.as_deref() else {
        return Ok(());
    };
    let Some(key) = key_from_public_url(&state.config.public_base_url, url) else {
        return Ok(());
    };
    let owned = is_attached_key(&key, shot.id)
        || !ShotRepo::image_url_in_use_elsewhere(&state.pool, url, shot.id).await?;
    if !owned {
        tracing::warn!(shot_id = shot.id, key = %key, "Refusing to delete image owned by another shot");
        return Ok(());
    }
    state.object_store.delete(SHOT_IMAGES_BUCKET, &key).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{id}/shots
///
/// Ordered by scene number, then position within the scene.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ShotList>>> {
    authorize_project(&state.pool, &user, project_id, Permission::View).await?;
    let shots = ShotRepo::list_by_project(&state.pool, project_id).await?;
    let progress = overall_progress(&shots);
    Ok(Json(DataResponse {
        data: ShotList {
            shots: shots.into_iter().map(ShotView::from).collect(),
            progress,
        },
    }))
}

/// POST /api/v1/projects/{id}/shots
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateShotRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ShotView>>)> {
    authorize_project(&state.pool, &user, project_id, Permission::Edit).await?;
    validate_shot_fields(input.priority.as_deref(), input.status.as_deref())?;
    if let Some(title) = &input.title {
        require_non_blank("title", title)?;
    }

    let scene_title = SceneRepo::find_by_number(&state.pool, project_id, input.scene_number)
        .await?
        .map(|scene| scene.title)
        .unwrap_or_default();
    let existing = ShotRepo::count_in_scene(&state.pool, project_id, input.scene_number).await?;
    let defaults = new_shot_defaults(&scene_title, existing as usize);

    let shot = ShotRepo::create(
        &state.pool,
        &CreateShot {
            project_id,
            scene_number: input.scene_number,
            title: input.title.unwrap_or(defaults.title),
            shot_type: input
                .shot_type
                .unwrap_or_else(|| defaults.shot_type.to_string()),
            camera_movement: input
                .camera_movement
                .unwrap_or_else(|| defaults.camera_movement.to_string()),
            description: input.description.unwrap_or_default(),
            duration: input
                .duration
                .unwrap_or_else(|| defaults.duration.to_string()),
            priority: input
                .priority
                .unwrap_or_else(|| defaults.priority.as_str().to_string()),
            status: input
                .status
                .unwrap_or_else(|| defaults.status.as_str().to_string()),
            notes: input.notes.unwrap_or_default(),
            image_url: input.image_url,
            order_index: input.order_index.unwrap_or(defaults.order_index),
        },
    )
    .await?;
    tracing::info!(shot_id = shot.id, project_id, "Shot created");
    publish_change(&state, project_id, ChangeTable::Shots, &user);

    Ok((StatusCode::CREATED, Json(DataResponse { data: shot.into() })))
}

/// PUT /api/v1/shots/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateShot>,
) -> AppResult<Json<DataResponse<ShotView>>> {
    authorize_shot(&state, &user, id, Permission::Edit).await?;
    validate_shot_fields(input.priority.as_deref(), input.status.as_deref())?;
    if let Some(title) = &input.title {
        require_non_blank("title", title)?;
    }

    let shot = ShotRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| gone(id))?;
    publish_change(&state, shot.project_id, ChangeTable::Shots, &user);
    Ok(Json(DataResponse { data: shot.into() }))
}

/// DELETE /api/v1/shots/{id}
///
/// Also removes the shot's stored reference image.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let shot = authorize_shot(&state, &user, id, Permission::Edit).await?;
    if !ShotRepo::delete(&state.pool, id).await? {
        return Err(gone(id));
    }
    if let Err(e) = delete_stored_image(&state, &shot).await {
        tracing::warn!(shot_id = id, error = %e, "Failed to delete shot image");
    }
    tracing::info!(shot_id = id, project_id = shot.project_id, "Shot deleted");
    publish_change(&state, shot.project_id, ChangeTable::Shots, &user);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/shots/{id}/duplicate
///
/// The copy sorts right after the source, starts over as pending and has no
/// reference image.
pub async fn duplicate(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<ShotView>>)> {
    let source = authorize_shot(&state, &user, id, Permission::Edit).await?;

    let shot = ShotRepo::create(
        &state.pool,
        &CreateShot {
            project_id: source.project_id,
            scene_number: source.scene_number,
            title: duplicate_title(&source.title),
            shot_type: source.shot_type,
            camera_movement: source.camera_movement,
            description: source.description,
            duration: source.duration,
            priority: source.priority,
            status: ShotStatus::Pending.as_str().to_string(),
            notes: source.notes,
            image_url: None,
            order_index: duplicate_order_index(source.order_index),
        },
    )
    .await?;
    publish_change(&state, shot.project_id, ChangeTable::Shots, &user);
    Ok((StatusCode::CREATED, Json(DataResponse { data: shot.into() })))
}

/// POST /api/v1/shots/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ShotView>>> {
    set_status(&state, &user, id, |_| Ok(ShotStatus::Completed)).await
}

/// POST /api/v1/shots/{id}/retake
///
/// Send a shot back to `pending`.
pub async fn retake(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ShotView>>> {
    set_status(&state, &user, id, |_| Ok(ShotStatus::Pending)).await
}

/// POST /api/v1/shots/{id}/toggle
///
/// Flip between `completed` and `pending`. An unrecognized stored status
/// counts as not completed.
pub async fn toggle(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ShotView>>> {
    set_status(&state, &user, id, |shot| {
        Ok(ShotStatus::from_str_db(&shot.status)
            .unwrap_or(ShotStatus::Pending)
            .toggled())
    })
    .await
}

/// PUT /api/v1/shots/{id}/image
///
/// Multipart upload with a `file` field. Replaces any previous image.
pub async fn upload_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<ShotView>>> {
    let shot = authorize_shot(&state, &user, id, Permission::Edit).await?;
    let upload = read_image(multipart, state.config.max_upload_bytes).await?;

    let key = shot_image_key(Some(id), Utc::now().timestamp_millis(), &upload.ext);
    state
        .object_store
        .put(SHOT_IMAGES_BUCKET, &key, &upload.bytes)
        .await?;
    let url = public_url(&state.config.public_base_url, &key);

    if shot.image_url.as_deref().is_some_and(|prev| prev != url) {
        if let Err(e) = delete_stored_image(&state, &shot).await {
            tracing::warn!(shot_id = id, error = %e, "Failed to delete replaced shot image");
        }
    }

    let shot = ShotRepo::set_image_url(&state.pool, id, Some(&url))
        .await?
        .ok_or_else(|| gone(id))?;
    tracing::info!(shot_id = id, key = %key, size = upload.bytes.len(), "Shot image uploaded");
    publish_change(&state, shot.project_id, ChangeTable::Shots, &user);
    Ok(Json(DataResponse { data: shot.into() }))
}

/// DELETE /api/v1/shots/{id}/image
pub async fn remove_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ShotView>>> {
    let shot = authorize_shot(&state, &user, id, Permission::Edit).await?;
    delete_stored_image(&state, &shot).await?;

    let shot = ShotRepo::set_image_url(&state.pool, id, None)
        .await?
        .ok_or_else(|| gone(id))?;
    publish_change(&state, shot.project_id, ChangeTable::Shots, &user);
    Ok(Json(DataResponse { data: shot.into() }))
}

/// POST /api/v1/projects/{id}/shot-images
///
/// Store an image for a shot that has not been created yet. The returned
/// URL goes into the new shot's `image_url`.
pub async fn upload_unattached_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<UploadedImage>>)> {
    authorize_project(&state.pool, &user, project_id, Permission::Edit).await?;
    let upload = read_image(multipart, state.config.max_upload_bytes).await?;

    let key = shot_image_key(None, Utc::now().timestamp_millis(), &upload.ext);
    state
        .object_store
        .put(SHOT_IMAGES_BUCKET, &key, &upload.bytes)
        .await?;
    let url = public_url(&state.config.public_base_url, &key);
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UploadedImage { key, url },
        }),
    ))
}
