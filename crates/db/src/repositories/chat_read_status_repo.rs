//! Repository for the `chat_read_status` table.

use filmcraft_core::types::DbId;
use sqlx::PgPool;

use crate::models::chat_read_status::ChatReadStatus;

const COLUMNS: &str = "project_id, user_id, last_read_message_id, updated_at";

pub struct ChatReadStatusRepo;

impl ChatReadStatusRepo {
    pub async fn find(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<Option<ChatReadStatus>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM chat_read_status WHERE project_id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, ChatReadStatus>(&query)
            .bind(project_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace the user's read marker for a project.
    pub async fn upsert(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
        last_read_message_id: Option<DbId>,
    ) -> Result<ChatReadStatus, sqlx::Error> {
        let query = format!(
            "INSERT INTO chat_read_status (project_id, user_id, last_read_message_id)
             VALUES ($1, $2, $3)
             ON CONFLICT (project_id, user_id) DO UPDATE SET
                last_read_message_id = EXCLUDED.last_read_message_id,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChatReadStatus>(&query)
            .bind(project_id)
            .bind(user_id)
            .bind(last_read_message_id)
            .fetch_one(pool)
            .await
    }
}
