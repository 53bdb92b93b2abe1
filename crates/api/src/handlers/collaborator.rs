//! Handlers for project collaborators (the team panel).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use filmcraft_core::collaboration::{
    film_role_label, is_valid_film_role, validate_invite_email, CollaboratorRole, Permission,
    DEFAULT_FILM_ROLE, FILM_ROLES,
};
use filmcraft_core::error::CoreError;
use filmcraft_core::types::DbId;
use filmcraft_db::models::collaborator::{CreateCollaborator, ProjectCollaborator};
use filmcraft_db::repositories::{CollaboratorRepo, UserRepo};
use filmcraft_events::ChangeTable;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::publish_change;
use crate::middleware::access::authorize_project;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A collaborator with the display label of their film role.
#[derive(Debug, Serialize)]
pub struct CollaboratorView {
    #[serde(flatten)]
    pub collaborator: ProjectCollaborator,
    pub film_role_label: &'static str,
    /// Whether the invitation has been claimed by an account.
    pub joined: bool,
}

impl From<ProjectCollaborator> for CollaboratorView {
    fn from(collaborator: ProjectCollaborator) -> Self {
        Self {
            film_role_label: film_role_label(&collaborator.film_role),
            joined: collaborator.user_id.is_some(),
            collaborator,
        }
    }
}

/// Request body for `POST /projects/{id}/collaborators`.
#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub email: String,
    /// `viewer` (default), `editor` or `admin`.
    pub role: Option<String>,
    pub film_role: Option<String>,
}

/// GET /api/v1/projects/{id}/collaborators
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<CollaboratorView>>>> {
    authorize_project(&state.pool, &user, project_id, Permission::View).await?;
    let collaborators = CollaboratorRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse {
        data: collaborators.into_iter().map(CollaboratorView::from).collect(),
    }))
}

/// POST /api/v1/projects/{id}/collaborators
///
/// Invite by email. If an account with the email exists it is linked right
/// away; otherwise the invitation is claimed when that email signs up.
pub async fn invite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<InviteRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CollaboratorView>>)> {
    let (project, _) = authorize_project(&state.pool, &user, project_id, Permission::Admin).await?;

    let email = validate_invite_email(&input.email)?;
    let role = match input.role.as_deref() {
        Some(role) => CollaboratorRole::from_str_db(role)?,
        None => CollaboratorRole::Viewer,
    };
    let film_role = input
        .film_role
        .unwrap_or_else(|| DEFAULT_FILM_ROLE.to_string());
    if !is_valid_film_role(&film_role) {
        let known: Vec<&str> = FILM_ROLES.iter().map(|(value, _)| *value).collect();
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid film role '{film_role}'. Must be one of: {}",
            known.join(", ")
        ))));
    }

    let invitee = UserRepo::find_by_email(&state.pool, &email).await?;
    if invitee.as_ref().is_some_and(|u| u.id == project.owner_id) {
        return Err(AppError::Core(CoreError::Conflict(
            "The project owner is already on the team".into(),
        )));
    }

    let collaborator = CollaboratorRepo::create(
        &state.pool,
        &CreateCollaborator {
            project_id,
            email,
            role,
            film_role,
            invited_by: user.user_id,
            user_id: invitee.map(|u| u.id),
        },
    )
    .await?;
    tracing::info!(
        project_id,
        collaborator_id = collaborator.id,
        role = role.as_str(),
        "Collaborator invited"
    );
    publish_change(&state, project_id, ChangeTable::Collaborators, &user);

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: collaborator.into(),
        }),
    ))
}

/// DELETE /api/v1/collaborators/{id}
pub async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "Collaborator",
            id,
        })
    };
    let collaborator = CollaboratorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    authorize_project(&state.pool, &user, collaborator.project_id, Permission::Admin).await?;

    if !CollaboratorRepo::delete(&state.pool, id).await? {
        return Err(not_found());
    }
    if let Some(user_id) = collaborator.user_id {
        let dropped = state.ws_manager.revoke(user_id, collaborator.project_id).await;
        tracing::debug!(user_id, dropped, "Revoked realtime subscriptions");
    }
    tracing::info!(project_id = collaborator.project_id, collaborator_id = id, "Collaborator removed");
    publish_change(&state, collaborator.project_id, ChangeTable::Collaborators, &user);
    Ok(StatusCode::NO_CONTENT)
}
