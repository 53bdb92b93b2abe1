//! Project-level authorization.
//!
//! A user reaches a project either as its owner or as a collaborator (matched
//! by account id or invited email). Handlers load the target row, then call
//! [`authorize_project`] with the permission the operation needs.

use filmcraft_core::collaboration::{Permission, ProjectAccess};
use filmcraft_core::error::CoreError;
use filmcraft_core::types::DbId;
use filmcraft_db::models::project::Project;
use filmcraft_db::repositories::{CollaboratorRepo, ProjectRepo};
use filmcraft_db::DbPool;

use super::auth::AuthUser;
use crate::error::{AppError, AppResult};

/// Resolve what `user` may do on `project`.
pub async fn resolve_access(
    pool: &DbPool,
    project: &Project,
    user: &AuthUser,
) -> AppResult<ProjectAccess> {
    if project.owner_id == user.user_id {
        return Ok(ProjectAccess::Owner);
    }
    let role =
        CollaboratorRepo::find_role_for_user(pool, project.id, user.user_id, &user.email).await?;
    Ok(ProjectAccess::resolve(project.owner_id, user.user_id, role))
}

/// Load a project and require `needed` on it.
///
/// A user with no access at all gets 404 rather than 403 so project ids do
/// not leak.
pub async fn authorize_project(
    pool: &DbPool,
    user: &AuthUser,
    project_id: DbId,
    needed: Permission,
) -> AppResult<(Project, ProjectAccess)> {
    let project = ProjectRepo::find_by_id(pool, project_id)
        .await?
        .ok_or_else(|| project_not_found(project_id))?;

    let access = resolve_access(pool, &project, user).await?;
    if access == ProjectAccess::None {
        return Err(project_not_found(project_id));
    }
    access.require(needed)?;
    Ok((project, access))
}

fn project_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    })
}
