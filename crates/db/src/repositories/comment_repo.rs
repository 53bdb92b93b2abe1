//! Repository for the `project_comments` table.

use filmcraft_core::chat::MessageMetadata;
use filmcraft_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::comment::{CreateComment, ProjectComment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, project_id, shot_id, user_id, content, message_type, metadata, created_at, updated_at";

/// Provides CRUD operations for project chat messages and shot comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a new message, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateComment,
    ) -> Result<ProjectComment, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_comments (project_id, shot_id, user_id, content, message_type, metadata)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectComment>(&query)
            .bind(input.project_id)
            .bind(input.shot_id)
            .bind(input.user_id)
            .bind(&input.content)
            .bind(input.message_type.as_str())
            .bind(Json(&input.metadata))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectComment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_comments WHERE id = $1");
        sqlx::query_as::<_, ProjectComment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Project-level chat (no shot), oldest first.
    pub async fn list_project_chat(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectComment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_comments
             WHERE project_id = $1 AND shot_id IS NULL
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, ProjectComment>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Comments attached to one shot, oldest first.
    pub async fn list_for_shot(
        pool: &PgPool,
        shot_id: DbId,
    ) -> Result<Vec<ProjectComment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_comments
             WHERE shot_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, ProjectComment>(&query)
            .bind(shot_id)
            .fetch_all(pool)
            .await
    }

    /// Case-insensitive substring search over project chat, newest first.
    pub async fn search(
        pool: &PgPool,
        project_id: DbId,
        term: &str,
        limit: i64,
    ) -> Result<Vec<ProjectComment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_comments
             WHERE project_id = $1 AND shot_id IS NULL
               AND content ILIKE '%' || $2 || '%'
             ORDER BY created_at DESC, id DESC
             LIMIT $3"
        );
        sqlx::query_as::<_, ProjectComment>(&query)
            .bind(project_id)
            .bind(escape_like(term))
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Replace content and metadata of a message.
    pub async fn update_content(
        pool: &PgPool,
        id: DbId,
        content: &str,
        metadata: &MessageMetadata,
    ) -> Result<Option<ProjectComment>, sqlx::Error> {
        let query = format!(
            "UPDATE project_comments SET content = $2, metadata = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectComment>(&query)
            .bind(id)
            .bind(content)
            .bind(Json(metadata))
            .fetch_optional(pool)
            .await
    }

    /// Delete a message. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Escape `ILIKE` wildcards so the term matches literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("plain"), "plain");
    }
}
