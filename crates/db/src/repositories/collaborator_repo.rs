//! Repository for the `project_collaborators` table.

use filmcraft_core::collaboration::CollaboratorRole;
use filmcraft_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::collaborator::{CreateCollaborator, ProjectCollaborator};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, email, role, film_role, permissions, invited_by, \
                       user_id, created_at, updated_at";

pub struct CollaboratorRepo;

impl CollaboratorRepo {
    /// Insert a collaborator. Permissions are derived from the role.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCollaborator,
    ) -> Result<ProjectCollaborator, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_collaborators
                (project_id, email, role, film_role, permissions, invited_by, user_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectCollaborator>(&query)
            .bind(input.project_id)
            .bind(&input.email)
            .bind(input.role.as_str())
            .bind(&input.film_role)
            .bind(Json(input.role.permissions()))
            .bind(input.invited_by)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectCollaborator>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_collaborators WHERE id = $1");
        sqlx::query_as::<_, ProjectCollaborator>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectCollaborator>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_collaborators
             WHERE project_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, ProjectCollaborator>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// The collaborator role a user holds on a project, matched by account
    /// or by invited email.
    pub async fn find_role_for_user(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
        email: &str,
    ) -> Result<Option<CollaboratorRole>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT role FROM project_collaborators
             WHERE project_id = $1 AND (user_id = $2 OR LOWER(email) = LOWER($3))
             ORDER BY CASE role WHEN 'admin' THEN 0 WHEN 'editor' THEN 1 ELSE 2 END
             LIMIT 1",
        )
        .bind(project_id)
        .bind(user_id)
        .bind(email)
        .fetch_optional(pool)
        .await?;
        Ok(row.and_then(|(role,)| CollaboratorRole::from_str_db(&role).ok()))
    }

    /// Link pending invitations for `email` to a newly registered account.
    pub async fn claim_invitations(
        pool: &PgPool,
        user_id: DbId,
        email: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE project_collaborators SET user_id = $1
             WHERE user_id IS NULL AND LOWER(email) = LOWER($2)",
        )
        .bind(user_id)
        .bind(email)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Remove a collaborator. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_collaborators WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
