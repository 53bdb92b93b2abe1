//! Handlers for the `/projects` resource and phase transitions.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use filmcraft_core::collaboration::{Permission, Permissions, ProjectAccess};
use filmcraft_core::error::{require_non_blank, CoreError};
use filmcraft_core::phase::{validate_phase_transition, AppRoute, ProjectPhase};
use filmcraft_core::shots::overall_progress;
use filmcraft_core::types::DbId;
use filmcraft_core::wizard::{validate_ideation_complete, validate_planning_complete, IdeationDraft};
use filmcraft_db::models::project::{CreateProject, Project, UpdateProject};
use filmcraft_db::repositories::{ProjectRepo, ShotRepo};
use filmcraft_events::ChangeTable;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::publish_change;
use crate::handlers::shot::delete_stored_image;
use crate::middleware::access::{authorize_project, resolve_access};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A project together with what the requesting user may do with it.
#[derive(Debug, Serialize)]
pub struct ProjectSummary {
    #[serde(flatten)]
    pub project: Project,
    /// `owner`, or the collaborator role.
    pub access: &'static str,
    pub permissions: Permissions,
    pub phase_label: &'static str,
    /// Client route that continues work on the project.
    pub continue_route: String,
}

impl ProjectSummary {
    pub(crate) fn new(project: Project, access: ProjectAccess) -> AppResult<Self> {
        let phase = project.phase()?;
        Ok(Self {
            access: access_label(access),
            permissions: access.permissions(),
            phase_label: phase.label(),
            continue_route: phase.continue_route(project.id).path(),
            project,
        })
    }
}

fn access_label(access: ProjectAccess) -> &'static str {
    match access {
        ProjectAccess::Owner => "owner",
        ProjectAccess::Collaborator(role) => role.as_str(),
        ProjectAccess::None => "none",
    }
}

/// Attach access information to each project in a listing.
pub(crate) async fn summarize_projects(
    state: &AppState,
    user: &AuthUser,
    projects: Vec<Project>,
) -> AppResult<Vec<ProjectSummary>> {
    let mut summaries = Vec::with_capacity(projects.len());
    for project in projects {
        let access = resolve_access(&state.pool, &project, user).await?;
        summaries.push(ProjectSummary::new(project, access)?);
    }
    Ok(summaries)
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /projects/{id}/advance`.
#[derive(Debug, Default, Deserialize)]
pub struct AdvanceRequest {
    /// Target phase; defaults to the next one.
    #[serde(default)]
    pub phase: Option<ProjectPhase>,
}

/// Query for `GET /routes/resolve`.
#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    pub path: String,
}

/// Where a client route lands for the requesting user.
#[derive(Debug, Serialize)]
pub struct RouteResolution {
    pub path: String,
    pub reachable: bool,
    /// Set when the route is not reachable in the project's current phase.
    pub redirect: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/projects
///
/// Projects the user owns or collaborates on, most recently updated first.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ProjectSummary>>>> {
    let projects = ProjectRepo::list_for_user(&state.pool, user.user_id, &user.email).await?;
    let data = summarize_projects(&state, &user, projects).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/projects
///
/// Finish the ideation wizard: every ideation step must be complete. The
/// project starts in the `planning` phase.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(draft): Json<IdeationDraft>,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectSummary>>)> {
    validate_ideation_complete(&draft)?;

    let project = ProjectRepo::create(
        &state.pool,
        &CreateProject {
            owner_id: user.user_id,
            draft,
            phase: ProjectPhase::Planning,
        },
    )
    .await?;
    tracing::info!(project_id = project.id, user_id = user.user_id, "Project created");
    publish_change(&state, project.id, ChangeTable::Projects, &user);

    let summary = ProjectSummary::new(project, ProjectAccess::Owner)?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: summary })))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectSummary>>> {
    let (project, access) = authorize_project(&state.pool, &user, id, Permission::View).await?;
    Ok(Json(DataResponse {
        data: ProjectSummary::new(project, access)?,
    }))
}

/// PUT /api/v1/projects/{id}
///
/// Replace the given ideation fields. Omitted fields are kept; the last
/// write wins per field.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<ProjectSummary>>> {
    let (_, access) = authorize_project(&state.pool, &user, id, Permission::Edit).await?;
    // Fields the ideation steps require may be changed but not cleared.
    let required = [
        ("title", &input.title),
        ("project_type", &input.project_type),
        ("duration", &input.duration),
        ("concept", &input.concept),
        ("key_message", &input.key_message),
        ("target_audience", &input.target_audience),
        ("tone", &input.tone),
    ];
    for (field, value) in required {
        if let Some(value) = value {
            require_non_blank(field, value)?;
        }
    }

    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    publish_change(&state, id, ChangeTable::Projects, &user);

    Ok(Json(DataResponse {
        data: ProjectSummary::new(project, access)?,
    }))
}

/// DELETE /api/v1/projects/{id}
///
/// Only the owner may delete. Scenes, shots, chat and collaborators go with
/// the project, and stored shot images are removed afterwards.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let (_, access) = authorize_project(&state.pool, &user, id, Permission::View).await?;
    if access != ProjectAccess::Owner {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the project owner can delete it".into(),
        )));
    }

    let shots = ShotRepo::list_by_project(&state.pool, id).await?;
    if !ProjectRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }));
    }
    for shot in shots.iter().filter(|shot| shot.image_url.is_some()) {
        if let Err(e) = delete_stored_image(&state, shot).await {
            tracing::warn!(shot_id = shot.id, error = %e, "Failed to delete shot image");
        }
    }
    tracing::info!(project_id = id, user_id = user.user_id, "Project deleted");
    publish_change(&state, id, ChangeTable::Projects, &user);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/projects/{id}/advance
///
/// Move the project one phase forward. Each target phase has a gate:
///
/// - `planning`: every ideation step complete
/// - `shooting`: every planning step complete
/// - `completed`: every shot completed
pub async fn advance(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<AdvanceRequest>,
) -> AppResult<Json<DataResponse<ProjectSummary>>> {
    let (project, access) = authorize_project(&state.pool, &user, id, Permission::Edit).await?;
    let current = project.phase()?;

    let target = match input.phase.or_else(|| current.next()) {
        Some(target) => target,
        None => {
            return Err(AppError::Core(CoreError::Validation(
                "Project is already completed".into(),
            )))
        }
    };
    validate_phase_transition(current, target)?;

    match target {
        ProjectPhase::Ideation => {}
        ProjectPhase::Planning => validate_ideation_complete(&project.ideation_draft())?,
        ProjectPhase::Shooting => validate_planning_complete(&project.planning_draft())?,
        ProjectPhase::Completed => {
            let shots = ShotRepo::list_by_project(&state.pool, id).await?;
            let progress = overall_progress(&shots);
            if progress < 100 {
                return Err(AppError::Core(CoreError::Validation(format!(
                    "All shots must be completed first ({progress}% done)"
                ))));
            }
        }
    }

    let project = ProjectRepo::set_phase(&state.pool, id, target)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    tracing::info!(
        project_id = id,
        from = current.as_str(),
        to = target.as_str(),
        "Project phase advanced"
    );
    publish_change(&state, id, ChangeTable::Projects, &user);

    Ok(Json(DataResponse {
        data: ProjectSummary::new(project, access)?,
    }))
}

/// GET /api/v1/routes/resolve?path=/planning/5
///
/// Route guard for clients: parses a hash route and, for project routes,
/// checks it against the project's phase. Unreachable routes redirect to
/// where work continues.
pub async fn resolve_route(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<RouteQuery>,
) -> AppResult<Json<DataResponse<RouteResolution>>> {
    let route = AppRoute::parse(&query.path).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Unknown route '{}'",
            query.path
        )))
    })?;

    let project_id = match route {
        AppRoute::Dashboard | AppRoute::Ideation => None,
        AppRoute::IdeationEdit(id)
        | AppRoute::Planning(id)
        | AppRoute::Shooting(id)
        | AppRoute::Project(id) => Some(id),
    };

    let resolution = match project_id {
        None => RouteResolution {
            path: route.path(),
            reachable: true,
            redirect: None,
        },
        Some(id) => {
            let (project, _) = authorize_project(&state.pool, &user, id, Permission::View).await?;
            let phase = project.phase()?;
            let reachable = route.is_reachable(phase);
            RouteResolution {
                path: route.path(),
                reachable,
                redirect: (!reachable).then(|| phase.continue_route(id).path()),
            }
        }
    };

    Ok(Json(DataResponse { data: resolution }))
}
