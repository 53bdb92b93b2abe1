//! Project phases and the client routes they gate.
//!
//! A project moves strictly forward through
//! `ideation -> planning -> shooting -> completed`. The phase decides which
//! wizard screens a client may open for that project.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The project's current wizard stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectPhase {
    Ideation,
    Planning,
    Shooting,
    Completed,
}

/// All phases in lifecycle order.
pub const ALL_PHASES: &[ProjectPhase] = &[
    ProjectPhase::Ideation,
    ProjectPhase::Planning,
    ProjectPhase::Shooting,
    ProjectPhase::Completed,
];

impl ProjectPhase {
    /// Parse a phase string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "ideation" => Ok(Self::Ideation),
            "planning" => Ok(Self::Planning),
            "shooting" => Ok(Self::Shooting),
            "completed" => Ok(Self::Completed),
            _ => Err(CoreError::Validation(format!(
                "Invalid phase '{s}'. Must be one of: ideation, planning, shooting, completed"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ideation => "ideation",
            Self::Planning => "planning",
            Self::Shooting => "shooting",
            Self::Completed => "completed",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Ideation => "Ideation",
            Self::Planning => "Planning",
            Self::Shooting => "Shooting",
            Self::Completed => "Completed",
        }
    }

    /// The phase that follows this one, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Ideation => Some(Self::Planning),
            Self::Planning => Some(Self::Shooting),
            Self::Shooting => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    /// The route a client should open to continue work on the project.
    pub fn continue_route(self, project_id: DbId) -> AppRoute {
        match self {
            Self::Ideation => AppRoute::IdeationEdit(project_id),
            Self::Planning => AppRoute::Planning(project_id),
            Self::Shooting => AppRoute::Shooting(project_id),
            Self::Completed => AppRoute::Project(project_id),
        }
    }
}

/// Validate a phase transition. Only a single step forward is allowed.
pub fn validate_phase_transition(
    current: ProjectPhase,
    next: ProjectPhase,
) -> Result<(), CoreError> {
    if current.next() == Some(next) {
        return Ok(());
    }
    Err(CoreError::Validation(format!(
        "Cannot move project from '{}' to '{}'. Phases advance one step at a time.",
        current.as_str(),
        next.as_str()
    )))
}

// ---------------------------------------------------------------------------
// Client routes
// ---------------------------------------------------------------------------

/// Hash-based client routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppRoute {
    Dashboard,
    Ideation,
    IdeationEdit(DbId),
    Planning(DbId),
    Shooting(DbId),
    Project(DbId),
}

impl AppRoute {
    /// Parse a route path such as `/planning/42`. A leading `#` is ignored.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.trim_start_matches('#');
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Some(Self::Dashboard),
            ["ideation"] => Some(Self::Ideation),
            [name, id] => {
                let id: DbId = id.parse().ok()?;
                match *name {
                    "ideation" => Some(Self::IdeationEdit(id)),
                    "planning" => Some(Self::Planning(id)),
                    "shooting" => Some(Self::Shooting(id)),
                    "project" => Some(Self::Project(id)),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Format the route as a path.
    pub fn path(self) -> String {
        match self {
            Self::Dashboard => "/".to_string(),
            Self::Ideation => "/ideation".to_string(),
            Self::IdeationEdit(id) => format!("/ideation/{id}"),
            Self::Planning(id) => format!("/planning/{id}"),
            Self::Shooting(id) => format!("/shooting/{id}"),
            Self::Project(id) => format!("/project/{id}"),
        }
    }

    /// Whether this route may be opened for a project in `phase`.
    ///
    /// Routes without a project are always reachable. The project overview
    /// is reachable in every phase.
    pub fn is_reachable(self, phase: ProjectPhase) -> bool {
        match self {
            Self::Dashboard | Self::Ideation | Self::Project(_) => true,
            Self::IdeationEdit(_) => phase == ProjectPhase::Ideation,
            Self::Planning(_) => phase >= ProjectPhase::Planning,
            Self::Shooting(_) => phase >= ProjectPhase::Shooting,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
