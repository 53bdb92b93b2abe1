//! Repository for the `shots` table.

use filmcraft_core::types::DbId;
use sqlx::PgPool;

use crate::models::shot::{CreateShot, Shot, UpdateShot};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, scene_number, title, shot_type, camera_movement, \
                       description, duration, priority, status, notes, image_url, \
                       order_index, created_at, updated_at";

/// Provides CRUD operations for shots.
pub struct ShotRepo;

impl ShotRepo {
    /// Insert a new shot, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateShot) -> Result<Shot, sqlx::Error> {
        let query = format!(
            "INSERT INTO shots (project_id, scene_number, title, shot_type, camera_movement,
                                description, duration, priority, status, notes, image_url,
                                order_index)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shot>(&query)
            .bind(input.project_id)
            .bind(input.scene_number)
            .bind(&input.title)
            .bind(&input.shot_type)
            .bind(&input.camera_movement)
            .bind(&input.description)
            .bind(&input.duration)
            .bind(&input.priority)
            .bind(&input.status)
            .bind(&input.notes)
            .bind(&input.image_url)
            .bind(input.order_index)
            .fetch_one(pool)
            .await
    }

    /// Find a shot by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Shot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shots WHERE id = $1");
        sqlx::query_as::<_, Shot>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's shots ordered by scene then position within the scene.
    pub async fn list_by_project(pool: &PgPool, project_id: DbId) -> Result<Vec<Shot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shots WHERE project_id = $1
             ORDER BY scene_number ASC, order_index ASC, id ASC"
        );
        sqlx::query_as::<_, Shot>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Number of shots in one scene of a project.
    pub async fn count_in_scene(
        pool: &PgPool,
        project_id: DbId,
        scene_number: i32,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM shots WHERE project_id = $1 AND scene_number = $2")
                .bind(project_id)
                .bind(scene_number)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Update a shot. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateShot,
    ) -> Result<Option<Shot>, sqlx::Error> {
        let query = format!(
            "UPDATE shots SET
                scene_number = COALESCE($2, scene_number),
                title = COALESCE($3, title),
                shot_type = COALESCE($4, shot_type),
                camera_movement = COALESCE($5, camera_movement),
                description = COALESCE($6, description),
                duration = COALESCE($7, duration),
                priority = COALESCE($8, priority),
                status = COALESCE($9, status),
                notes = COALESCE($10, notes),
                order_index = COALESCE($11, order_index)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shot>(&query)
            .bind(id)
            .bind(input.scene_number)
            .bind(&input.title)
            .bind(&input.shot_type)
            .bind(&input.camera_movement)
            .bind(&input.description)
            .bind(&input.duration)
            .bind(&input.priority)
            .bind(&input.status)
            .bind(&input.notes)
            .bind(input.order_index)
            .fetch_optional(pool)
            .await
    }

    /// Set the shot's status.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Shot>, sqlx::Error> {
        let query = format!("UPDATE shots SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Shot>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Set or clear the reference image URL.
    pub async fn set_image_url(
        pool: &PgPool,
        id: DbId,
        image_url: Option<&str>,
    ) -> Result<Option<Shot>, sqlx::Error> {
        let query = format!("UPDATE shots SET image_url = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Shot>(&query)
            .bind(id)
            .bind(image_url)
            .fetch_optional(pool)
            .await
    }

    /// Whether any shot other than `id` points at `image_url`.
    pub async fn image_url_in_use_elsewhere(
        pool: &PgPool,
        image_url: &str,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (in_use,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM shots WHERE image_url = $1 AND id <> $2)",
        )
        .bind(image_url)
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(in_use)
    }

    /// Delete a shot. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM shots WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
