//! Per-user chat read marker.

use filmcraft_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from `chat_read_status`, keyed by `(project_id, user_id)`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChatReadStatus {
    pub project_id: DbId,
    pub user_id: DbId,
    pub last_read_message_id: Option<DbId>,
    pub updated_at: Timestamp,
}
