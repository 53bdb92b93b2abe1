//! Project chat rules: message types, metadata, unread counting, and
//! client-side style filtering.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Maximum number of messages returned by a server-side search.
pub const SEARCH_RESULT_LIMIT: i64 = 20;

/// Unread counts above this are displayed as `99+`.
pub const UNREAD_BADGE_MAX: usize = 99;

/// Author label for messages without an author email.
pub const UNKNOWN_AUTHOR_LABEL: &str = "Team Member";

// ---------------------------------------------------------------------------
// Message type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    #[default]
    General,
    Announcement,
    Question,
}

impl MessageType {
    pub const ALL: &'static [MessageType] = &[Self::General, Self::Announcement, Self::Question];

    /// Strict parse used when accepting input.
    pub fn from_name(s: &str) -> Result<Self, CoreError> {
        match s {
            "general" => Ok(Self::General),
            "announcement" => Ok(Self::Announcement),
            "question" => Ok(Self::Question),
            _ => Err(CoreError::Validation(format!(
                "Invalid message type '{s}'. Must be one of: general, announcement, question"
            ))),
        }
    }

    /// Lenient parse used when reading stored rows.
    pub fn from_stored(s: Option<&str>) -> Self {
        s.and_then(|s| Self::from_name(s).ok()).unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Announcement => "announcement",
            Self::Question => "question",
        }
    }
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Free-form metadata stored with each message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub edited: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<Timestamp>,
}

impl MessageMetadata {
    pub fn new(author_email: &str, now: Timestamp) -> Self {
        Self {
            author_email: Some(author_email.to_string()),
            timestamp: Some(now),
            edited: false,
            edited_at: None,
        }
    }

    /// Mark as edited, keeping the original author and timestamp.
    pub fn mark_edited(&mut self, now: Timestamp) {
        self.edited = true;
        self.edited_at = Some(now);
    }
}

/// Reject blank message content and return it trimmed.
pub fn validate_content(content: &str) -> Result<&str, CoreError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Message content cannot be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

/// Only the author may edit or delete a message.
pub fn require_author(author_id: DbId, user_id: DbId) -> Result<(), CoreError> {
    if author_id != user_id {
        return Err(CoreError::Forbidden(
            "Only the author can change this message".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Anything that looks like a chat message.
pub trait ChatMessage {
    fn id(&self) -> DbId;
    fn author_id(&self) -> DbId;
    fn content(&self) -> &str;
    fn message_type(&self) -> MessageType;
    fn author_email(&self) -> Option<&str>;
}

/// Messages after `last_read_id` not written by `user_id`.
///
/// `messages` must be in chronological order. When `last_read_id` is absent
/// or no longer present, every message counts.
pub fn unread_count<M: ChatMessage>(messages: &[M], last_read_id: Option<DbId>, user_id: DbId) -> usize {
    let start = last_read_id
        .and_then(|id| messages.iter().position(|m| m.id() == id))
        .map_or(0, |index| index + 1);
    messages[start..]
        .iter()
        .filter(|m| m.author_id() != user_id)
        .count()
}

/// Badge text for an unread count; `None` when there is nothing unread.
pub fn unread_badge(count: usize) -> Option<String> {
    match count {
        0 => None,
        n if n > UNREAD_BADGE_MAX => Some(format!("{UNREAD_BADGE_MAX}+")),
        n => Some(n.to_string()),
    }
}

/// Filter by type and a case-insensitive query over content and author.
pub fn filter_messages<'a, M: ChatMessage>(
    messages: &'a [M],
    type_filter: Option<MessageType>,
    query: &str,
) -> Vec<&'a M> {
    let query = query.trim().to_lowercase();
    messages
        .iter()
        .filter(|m| type_filter.is_none_or(|t| m.message_type() == t))
        .filter(|m| {
            query.is_empty()
                || m.content().to_lowercase().contains(&query)
                || m.author_email()
                    .unwrap_or_default()
                    .to_lowercase()
                    .contains(&query)
        })
        .collect()
}

/// How a message author is shown to `viewer_id`.
pub fn author_label<M: ChatMessage>(message: &M, viewer_id: DbId) -> String {
    if message.author_id() == viewer_id {
        return "You".to_string();
    }
    message
        .author_email()
        .unwrap_or(UNKNOWN_AUTHOR_LABEL)
        .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
