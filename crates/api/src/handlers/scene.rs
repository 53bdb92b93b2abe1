//! Handlers for scenes and their pre-shoot checklists.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use filmcraft_core::collaboration::{Permission, ProjectAccess};
use filmcraft_core::error::{require_non_blank, CoreError};
use filmcraft_core::planning::{clean_resources, Resources, LOCATION_TYPES};
use filmcraft_core::scenes::{
    checklist_progress, is_checklist_complete, scenes_from_story_structure, set_all,
    toggle_checklist_item, SCENE_CHECKLIST_ITEMS,
};
use filmcraft_core::shots::scene_progress;
use filmcraft_core::types::DbId;
use filmcraft_db::models::project::Project;
use filmcraft_db::models::scene::{Scene, UpdateScene};
use filmcraft_db::repositories::{SceneRepo, ShotRepo};
use filmcraft_events::ChangeTable;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::publish_change;
use crate::middleware::access::authorize_project;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// A scene with its checklist and shot progress.
#[derive(Debug, Serialize)]
pub struct SceneView {
    #[serde(flatten)]
    pub scene: Scene,
    pub checklist_progress: u8,
    pub checklist_complete: bool,
    pub shot_progress: u8,
}

impl SceneView {
    fn new(scene: Scene, shot_progress: u8) -> Self {
        Self {
            checklist_progress: checklist_progress(SCENE_CHECKLIST_ITEMS, &scene.checklist),
            checklist_complete: is_checklist_complete(SCENE_CHECKLIST_ITEMS, &scene.checklist),
            shot_progress,
            scene,
        }
    }
}

/// Request body for `POST /scenes/{id}/checklist/toggle`.
#[derive(Debug, Deserialize)]
pub struct ToggleItemRequest {
    pub key: String,
}

/// Request body for `PUT /scenes/{id}/checklist`.
#[derive(Debug, Deserialize)]
pub struct SetAllRequest {
    pub checked: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a scene and check the caller's access to its project.
async fn authorize_scene(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
    needed: Permission,
) -> AppResult<(Scene, Project, ProjectAccess)> {
    let scene = SceneRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Scene",
            id,
        }))?;
    let (project, access) = authorize_project(&state.pool, user, scene.project_id, needed).await?;
    Ok((scene, project, access))
}

async fn scene_view(state: &AppState, scene: Scene) -> AppResult<SceneView> {
    let shots = ShotRepo::list_by_project(&state.pool, scene.project_id).await?;
    let progress = scene_progress(&shots, scene.scene_number);
    Ok(SceneView::new(scene, progress))
}

fn gone(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Scene",
        id,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{id}/scenes
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<SceneView>>>> {
    authorize_project(&state.pool, &user, project_id, Permission::View).await?;
    let scenes = SceneRepo::list_by_project(&state.pool, project_id).await?;
    let shots = ShotRepo::list_by_project(&state.pool, project_id).await?;

    let data = scenes
        .into_iter()
        .map(|scene| {
            let progress = scene_progress(&shots, scene.scene_number);
            SceneView::new(scene, progress)
        })
        .collect();
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/projects/{id}/scenes/sync
///
/// Materialize scenes from the story structure. Does nothing when the
/// project already has scenes; a project without a story gets one default
/// scene.
pub async fn sync(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Scene>>>> {
    let (project, _) = authorize_project(&state.pool, &user, project_id, Permission::Edit).await?;
    let drafts = scenes_from_story_structure(&project.story_structure, &project.resources);
    let scenes = SceneRepo::create_many_if_empty(&state.pool, project_id, &drafts).await?;
    tracing::debug!(project_id, count = scenes.len(), "Scenes synced");
    publish_change(&state, project_id, ChangeTable::Scenes, &user);
    Ok(Json(DataResponse { data: scenes }))
}

/// PUT /api/v1/scenes/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateScene>,
) -> AppResult<Json<DataResponse<SceneView>>> {
    authorize_scene(&state, &user, id, Permission::Edit).await?;
    if let Some(title) = &input.title {
        require_non_blank("title", title)?;
    }
    if let Some(location_type) = &input.location_type {
        if !LOCATION_TYPES.contains(&location_type.as_str()) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Invalid location type '{location_type}'. Must be one of: {}",
                LOCATION_TYPES.join(", ")
            ))));
        }
    }

    let scene = SceneRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| gone(id))?;
    publish_change(&state, scene.project_id, ChangeTable::Scenes, &user);
    Ok(Json(DataResponse {
        data: scene_view(&state, scene).await?,
    }))
}

/// DELETE /api/v1/scenes/{id}
///
/// Shots filed under the scene number are kept.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let (scene, _, _) = authorize_scene(&state, &user, id, Permission::Edit).await?;
    if !SceneRepo::delete(&state.pool, id).await? {
        return Err(gone(id));
    }
    tracing::info!(scene_id = id, project_id = scene.project_id, "Scene deleted");
    publish_change(&state, scene.project_id, ChangeTable::Scenes, &user);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/scenes/{id}/checklist/toggle
pub async fn toggle_checklist(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ToggleItemRequest>,
) -> AppResult<Json<DataResponse<SceneView>>> {
    let (scene, _, _) = authorize_scene(&state, &user, id, Permission::Edit).await?;
    let mut checklist = scene.checklist.0;
    let checked = toggle_checklist_item(SCENE_CHECKLIST_ITEMS, &mut checklist, &input.key)?;

    let scene = SceneRepo::set_checklist(&state.pool, id, &checklist)
        .await?
        .ok_or_else(|| gone(id))?;
    tracing::debug!(scene_id = id, key = %input.key, checked, "Checklist item toggled");
    publish_change(&state, scene.project_id, ChangeTable::Scenes, &user);
    Ok(Json(DataResponse {
        data: scene_view(&state, scene).await?,
    }))
}

/// PUT /api/v1/scenes/{id}/checklist
///
/// Check or uncheck every item at once.
pub async fn set_checklist(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<SetAllRequest>,
) -> AppResult<Json<DataResponse<SceneView>>> {
    authorize_scene(&state, &user, id, Permission::Edit).await?;
    let checklist = set_all(SCENE_CHECKLIST_ITEMS, input.checked);

    let scene = SceneRepo::set_checklist(&state.pool, id, &checklist)
        .await?
        .ok_or_else(|| gone(id))?;
    publish_change(&state, scene.project_id, ChangeTable::Scenes, &user);
    Ok(Json(DataResponse {
        data: scene_view(&state, scene).await?,
    }))
}

/// PUT /api/v1/scenes/{id}/resources
pub async fn replace_resources(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(resources): Json<Resources>,
) -> AppResult<Json<DataResponse<SceneView>>> {
    authorize_scene(&state, &user, id, Permission::Edit).await?;
    let resources = clean_resources(resources);

    let scene = SceneRepo::set_resources(&state.pool, id, &resources)
        .await?
        .ok_or_else(|| gone(id))?;
    publish_change(&state, scene.project_id, ChangeTable::Scenes, &user);
    Ok(Json(DataResponse {
        data: scene_view(&state, scene).await?,
    }))
}
