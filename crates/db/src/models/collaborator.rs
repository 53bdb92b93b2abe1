//! Project collaborator model and DTOs.

use filmcraft_core::collaboration::{CollaboratorRole, Permissions};
use filmcraft_core::error::CoreError;
use filmcraft_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from `project_collaborators`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectCollaborator {
    pub id: DbId,
    pub project_id: DbId,
    pub email: String,
    pub role: String,
    pub film_role: String,
    pub permissions: Json<Permissions>,
    pub invited_by: Option<DbId>,
    pub user_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProjectCollaborator {
    pub fn role(&self) -> Result<CollaboratorRole, CoreError> {
        CollaboratorRole::from_str_db(&self.role)
    }
}

#[derive(Debug, Clone)]
pub struct CreateCollaborator {
    pub project_id: DbId,
    pub email: String,
    pub role: CollaboratorRole,
    pub film_role: String,
    pub invited_by: DbId,
    /// Set when an account with this email already exists.
    pub user_id: Option<DbId>,
}
