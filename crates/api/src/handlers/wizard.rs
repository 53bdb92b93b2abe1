//! Wizard progress and step navigation.
//!
//! The ideation wizard runs before a project exists, so it has a stateless
//! endpoint that takes the draft in the body. The planning wizard (and
//! re-opened ideation) reads the stored project.

use axum::extract::{Path, State};
use axum::Json;
use filmcraft_core::collaboration::Permission;
use filmcraft_core::types::DbId;
use filmcraft_core::wizard::{
    ideation_progress, planning_progress, validate_step_navigation, IdeationDraft,
    WizardProgress,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::access::authorize_project;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A move between two 1-based wizard steps.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StepMove {
    pub current: u8,
    pub next: u8,
}

/// Request body for `POST /wizard/ideation`.
#[derive(Debug, Deserialize)]
pub struct IdeationCheckRequest {
    #[serde(flatten)]
    pub draft: IdeationDraft,
    #[serde(default)]
    pub navigate: Option<StepMove>,
}

/// Progress plus the step the client should show.
#[derive(Debug, Serialize)]
pub struct WizardState {
    pub step: u8,
    pub progress: WizardProgress,
}

/// Which wizard a path segment names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WizardKind {
    Ideation,
    Planning,
}

impl WizardKind {
    fn parse(s: &str) -> AppResult<Self> {
        match s {
            "ideation" => Ok(Self::Ideation),
            "planning" => Ok(Self::Planning),
            other => Err(AppError::BadRequest(format!(
                "Unknown wizard '{other}'. Must be one of: ideation, planning"
            ))),
        }
    }
}

/// Apply an optional move and report where the wizard lands.
fn navigate(progress: WizardProgress, step_move: Option<StepMove>) -> AppResult<WizardState> {
    let total = progress.steps.len() as u8;
    let step = match step_move {
        Some(StepMove { current, next }) => {
            let current_complete = progress
                .steps
                .iter()
                .find(|s| s.index == current)
                .is_some_and(|s| s.complete);
            validate_step_navigation(current, next, total, current_complete)?;
            next
        }
        None => progress.first_incomplete().unwrap_or(total),
    };
    Ok(WizardState { step, progress })
}

/// POST /api/v1/wizard/ideation
///
/// Progress of an unsaved ideation draft, optionally validating a step move.
pub async fn check_ideation(
    _user: AuthUser,
    Json(input): Json<IdeationCheckRequest>,
) -> AppResult<Json<DataResponse<WizardState>>> {
    let data = navigate(ideation_progress(&input.draft), input.navigate)?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/projects/{id}/wizard/{wizard}
pub async fn progress(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, wizard)): Path<(DbId, String)>,
) -> AppResult<Json<DataResponse<WizardState>>> {
    let data = navigate(project_progress(&state, &user, id, &wizard).await?, None)?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/projects/{id}/wizard/{wizard}/navigate
pub async fn navigate_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, wizard)): Path<(DbId, String)>,
    Json(step_move): Json<StepMove>,
) -> AppResult<Json<DataResponse<WizardState>>> {
    let progress = project_progress(&state, &user, id, &wizard).await?;
    let data = navigate(progress, Some(step_move))?;
    Ok(Json(DataResponse { data }))
}

async fn project_progress(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
    wizard: &str,
) -> AppResult<WizardProgress> {
    let kind = WizardKind::parse(wizard)?;
    let (project, _) = authorize_project(&state.pool, user, id, Permission::View).await?;
    Ok(match kind {
        WizardKind::Ideation => ideation_progress(&project.ideation_draft()),
        WizardKind::Planning => planning_progress(&project.planning_draft()),
    })
}
