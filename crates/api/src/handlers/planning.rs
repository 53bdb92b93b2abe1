//! Planning sub-editors.
//!
//! Each editor replaces one collection on the project wholesale; there is no
//! merge with concurrent edits.

use axum::extract::{Path, State};
use axum::Json;
use filmcraft_core::collaboration::Permission;
use filmcraft_core::error::CoreError;
use filmcraft_core::planning::{
    clean_resources, group_schedule_by_date, schedule_type_label, validate_locations,
    validate_schedule_entry, Location, Resources, ScheduleEntry, StorySegment, TimelineItem,
};
use filmcraft_core::scenes::scenes_from_script;
use filmcraft_core::script::segment_script;
use filmcraft_core::types::DbId;
use filmcraft_db::models::project::{Project, ProjectCollection};
use filmcraft_db::models::scene::Scene;
use filmcraft_db::repositories::{ProjectRepo, SceneRepo};
use filmcraft_events::ChangeTable;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::project::ProjectSummary;
use crate::handlers::publish_change;
use crate::middleware::access::authorize_project;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `PUT /projects/{id}/script`. `null` clears the script.
#[derive(Debug, Deserialize)]
pub struct ScriptRequest {
    pub script: Option<String>,
}

/// Schedule entries for one day.
#[derive(Debug, Serialize)]
pub struct ScheduleDay {
    pub date: String,
    pub entries: Vec<LabeledScheduleEntry>,
}

#[derive(Debug, Serialize)]
pub struct LabeledScheduleEntry {
    #[serde(flatten)]
    pub entry: ScheduleEntry,
    pub type_label: &'static str,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    })
}

async fn replace<T: Serialize + Sync>(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
    collection: ProjectCollection,
    value: &T,
) -> AppResult<Json<DataResponse<ProjectSummary>>> {
    let (_, access) = authorize_project(&state.pool, user, id, Permission::Edit).await?;
    let project: Project = ProjectRepo::replace_collection(&state.pool, id, collection, value)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::debug!(project_id = id, column = collection.column(), "Replaced planning collection");
    publish_change(state, id, ChangeTable::Projects, user);
    Ok(Json(DataResponse {
        data: ProjectSummary::new(project, access)?,
    }))
}

fn schedule_days(entries: &[ScheduleEntry]) -> Vec<ScheduleDay> {
    group_schedule_by_date(entries)
        .into_iter()
        .map(|(date, entries)| ScheduleDay {
            date,
            entries: entries
                .into_iter()
                .map(|entry| LabeledScheduleEntry {
                    type_label: schedule_type_label(&entry.entry_type),
                    entry,
                })
                .collect(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// PUT /api/v1/projects/{id}/story-structure
pub async fn replace_story_structure(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(segments): Json<Vec<StorySegment>>,
) -> AppResult<Json<DataResponse<ProjectSummary>>> {
    replace(&state, &user, id, ProjectCollection::StoryStructure, &segments).await
}

/// PUT /api/v1/projects/{id}/locations
pub async fn replace_locations(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(locations): Json<Vec<Location>>,
) -> AppResult<Json<DataResponse<ProjectSummary>>> {
    validate_locations(&locations)?;
    replace(&state, &user, id, ProjectCollection::Locations, &locations).await
}

/// PUT /api/v1/projects/{id}/resources
///
/// Items are trimmed and blank ones dropped before saving.
pub async fn replace_resources(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(resources): Json<Resources>,
) -> AppResult<Json<DataResponse<ProjectSummary>>> {
    let resources = clean_resources(resources);
    replace(&state, &user, id, ProjectCollection::Resources, &resources).await
}

/// GET /api/v1/projects/{id}/schedule
///
/// The production schedule grouped by day.
pub async fn get_schedule(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ScheduleDay>>>> {
    let (project, _) = authorize_project(&state.pool, &user, id, Permission::View).await?;
    Ok(Json(DataResponse {
        data: schedule_days(&project.production_schedule),
    }))
}

/// PUT /api/v1/projects/{id}/schedule
pub async fn replace_schedule(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(entries): Json<Vec<ScheduleEntry>>,
) -> AppResult<Json<DataResponse<ProjectSummary>>> {
    for entry in &entries {
        validate_schedule_entry(entry)?;
    }
    replace(&state, &user, id, ProjectCollection::ProductionSchedule, &entries).await
}

/// PUT /api/v1/projects/{id}/timeline
pub async fn replace_timeline(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(items): Json<Vec<TimelineItem>>,
) -> AppResult<Json<DataResponse<ProjectSummary>>> {
    if let Some(index) = items.iter().position(|item| item.task.trim().is_empty()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Timeline item {} requires a task",
            index + 1
        ))));
    }
    replace(&state, &user, id, ProjectCollection::Timeline, &items).await
}

/// PUT /api/v1/projects/{id}/script
pub async fn replace_script(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ScriptRequest>,
) -> AppResult<Json<DataResponse<ProjectSummary>>> {
    let (_, access) = authorize_project(&state.pool, &user, id, Permission::Edit).await?;
    let script = input.script.as_deref().filter(|s| !s.trim().is_empty());
    let project = ProjectRepo::set_script(&state.pool, id, script)
        .await?
        .ok_or_else(|| not_found(id))?;
    publish_change(&state, id, ChangeTable::Projects, &user);
    Ok(Json(DataResponse {
        data: ProjectSummary::new(project, access)?,
    }))
}

/// POST /api/v1/projects/{id}/script/scenes
///
/// Segment the saved script into scenes and replace the project's scene
/// list with them.
pub async fn generate_scenes_from_script(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Scene>>>> {
    let (project, _) = authorize_project(&state.pool, &user, id, Permission::Edit).await?;

    let script_scenes = segment_script(project.script.as_deref().unwrap_or_default());
    if script_scenes.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "No scenes detected. Start scenes with SCENE, INT. or EXT.".into(),
        )));
    }

    let scenes = SceneRepo::replace_all(&state.pool, id, &scenes_from_script(&script_scenes)).await?;
    tracing::info!(project_id = id, count = scenes.len(), "Generated scenes from script");
    publish_change(&state, id, ChangeTable::Scenes, &user);
    Ok(Json(DataResponse { data: scenes }))
}
