//! Repository for the `projects` table.

use filmcraft_core::phase::ProjectPhase;
use filmcraft_core::types::DbId;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, ProjectCollection, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, title, concept, project_type, target_audience, duration, \
                       tone, key_message, inspiration, unique_angle, phase, story_structure, \
                       locations, resources, production_schedule, timeline, script, \
                       completed_at, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (owner_id, title, concept, project_type, target_audience,
                                   duration, tone, key_message, inspiration, unique_angle, phase)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        let d = &input.draft;
        sqlx::query_as::<_, Project>(&query)
            .bind(input.owner_id)
            .bind(d.title.trim())
            .bind(&d.concept)
            .bind(&d.project_type)
            .bind(&d.target_audience)
            .bind(&d.duration)
            .bind(&d.tone)
            .bind(&d.key_message)
            .bind(&d.inspiration)
            .bind(&d.unique_angle)
            .bind(input.phase.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Projects the user owns or collaborates on, most recently updated first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        email: &str,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE owner_id = $1
                OR id IN (
                    SELECT project_id FROM project_collaborators
                    WHERE user_id = $1 OR LOWER(email) = LOWER($2)
                )
             ORDER BY updated_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .bind(email)
            .fetch_all(pool)
            .await
    }

    /// Update text fields. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                title = COALESCE($2, title),
                concept = COALESCE($3, concept),
                project_type = COALESCE($4, project_type),
                target_audience = COALESCE($5, target_audience),
                duration = COALESCE($6, duration),
                tone = COALESCE($7, tone),
                key_message = COALESCE($8, key_message),
                inspiration = COALESCE($9, inspiration),
                unique_angle = COALESCE($10, unique_angle)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.concept)
            .bind(&input.project_type)
            .bind(&input.target_audience)
            .bind(&input.duration)
            .bind(&input.tone)
            .bind(&input.key_message)
            .bind(&input.inspiration)
            .bind(&input.unique_angle)
            .fetch_optional(pool)
            .await
    }

    /// Move the project to `phase`. Entering `completed` stamps `completed_at`.
    pub async fn set_phase(
        pool: &PgPool,
        id: DbId,
        phase: ProjectPhase,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                phase = $2,
                completed_at = CASE WHEN $2 = 'completed' THEN NOW() ELSE NULL END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(phase.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Replace one JSON collection column wholesale.
    pub async fn replace_collection<T: Serialize + Sync>(
        pool: &PgPool,
        id: DbId,
        collection: ProjectCollection,
        value: &T,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET {} = $2 WHERE id = $1 RETURNING {COLUMNS}",
            collection.column()
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(Json(value))
            .fetch_optional(pool)
            .await
    }

    /// Replace the script text. `None` clears it.
    pub async fn set_script(
        pool: &PgPool,
        id: DbId,
        script: Option<&str>,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("UPDATE projects SET script = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(script)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project and, by cascade, everything under it.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
