//! Repository for the `scenes` table.

use filmcraft_core::planning::Resources;
use filmcraft_core::scenes::{Checklist, SceneDraft};
use filmcraft_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::scene::{CreateScene, Scene, UpdateScene};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, scene_number, title, description, location, \
                       location_type, content, checklist, resources, created_at, updated_at";

/// Provides CRUD operations for scenes.
pub struct SceneRepo;

impl SceneRepo {
    /// Insert a new scene, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateScene) -> Result<Scene, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        insert(&mut conn, input.project_id, &input.draft).await
    }

    /// Find a scene by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Scene>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scenes WHERE id = $1");
        sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a scene by its number within a project.
    pub async fn find_by_number(
        pool: &PgPool,
        project_id: DbId,
        scene_number: i32,
    ) -> Result<Option<Scene>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM scenes WHERE project_id = $1 AND scene_number = $2");
        sqlx::query_as::<_, Scene>(&query)
            .bind(project_id)
            .bind(scene_number)
            .fetch_optional(pool)
            .await
    }

    /// List a project's scenes in scene order.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Scene>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scenes WHERE project_id = $1 ORDER BY scene_number ASC"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Insert `drafts` only if the project has no scenes yet.
    ///
    /// Returns the project's scenes afterwards either way.
    pub async fn create_many_if_empty(
        pool: &PgPool,
        project_id: DbId,
        drafts: &[SceneDraft],
    ) -> Result<Vec<Scene>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        lock_project(&mut tx, project_id).await?;

        let (existing,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM scenes WHERE project_id = $1")
                .bind(project_id)
                .fetch_one(&mut *tx)
                .await?;
        if existing == 0 {
            for draft in drafts {
                insert(&mut tx, project_id, draft).await?;
            }
        }
        tx.commit().await?;

        Self::list_by_project(pool, project_id).await
    }

    /// Delete every scene of the project and insert `drafts` in their place.
    pub async fn replace_all(
        pool: &PgPool,
        project_id: DbId,
        drafts: &[SceneDraft],
    ) -> Result<Vec<Scene>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        lock_project(&mut tx, project_id).await?;

        sqlx::query("DELETE FROM scenes WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;
        let mut scenes = Vec::with_capacity(drafts.len());
        for draft in drafts {
            scenes.push(insert(&mut tx, project_id, draft).await?);
        }
        tx.commit().await?;
        Ok(scenes)
    }

    /// Update descriptive fields. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateScene,
    ) -> Result<Option<Scene>, sqlx::Error> {
        let query = format!(
            "UPDATE scenes SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                location = COALESCE($4, location),
                location_type = COALESCE($5, location_type),
                content = COALESCE($6, content)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.location)
            .bind(&input.location_type)
            .bind(&input.content)
            .fetch_optional(pool)
            .await
    }

    /// Replace the scene's checklist.
    pub async fn set_checklist(
        pool: &PgPool,
        id: DbId,
        checklist: &Checklist,
    ) -> Result<Option<Scene>, sqlx::Error> {
        let query = format!("UPDATE scenes SET checklist = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .bind(Json(checklist))
            .fetch_optional(pool)
            .await
    }

    /// Replace the scene's resource map.
    pub async fn set_resources(
        pool: &PgPool,
        id: DbId,
        resources: &Resources,
    ) -> Result<Option<Scene>, sqlx::Error> {
        let query = format!("UPDATE scenes SET resources = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .bind(Json(resources))
            .fetch_optional(pool)
            .await
    }

    /// Delete a scene. Its shots are kept. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM scenes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Serialize scene rewrites for one project.
async fn lock_project(
    tx: &mut Transaction<'_, Postgres>,
    project_id: DbId,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT id FROM projects WHERE id = $1 FOR UPDATE")
        .bind(project_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn insert(
    conn: &mut sqlx::PgConnection,
    project_id: DbId,
    draft: &SceneDraft,
) -> Result<Scene, sqlx::Error> {
    let query = format!(
        "INSERT INTO scenes (project_id, scene_number, title, description, location,
                             location_type, content, resources)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, Scene>(&query)
        .bind(project_id)
        .bind(draft.scene_number)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.location)
        .bind(&draft.location_type)
        .bind(&draft.content)
        .bind(Json(&draft.resources))
        .fetch_one(conn)
        .await
}
