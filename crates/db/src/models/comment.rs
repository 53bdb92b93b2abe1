//! Project comment (chat message) model and DTOs.

use filmcraft_core::chat::{ChatMessage, MessageMetadata, MessageType};
use filmcraft_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from `project_comments`. `shot_id` is `None` for project chat.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectComment {
    pub id: DbId,
    pub project_id: DbId,
    pub shot_id: Option<DbId>,
    pub user_id: DbId,
    pub content: String,
    pub message_type: String,
    pub metadata: Json<MessageMetadata>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ChatMessage for ProjectComment {
    fn id(&self) -> DbId {
        self.id
    }

    fn author_id(&self) -> DbId {
        self.user_id
    }

    fn content(&self) -> &str {
        &self.content
    }

    fn message_type(&self) -> MessageType {
        MessageType::from_stored(Some(&self.message_type))
    }

    fn author_email(&self) -> Option<&str> {
        self.metadata.author_email.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct CreateComment {
    pub project_id: DbId,
    pub shot_id: Option<DbId>,
    pub user_id: DbId,
    pub content: String,
    pub message_type: MessageType,
    pub metadata: MessageMetadata,
}
