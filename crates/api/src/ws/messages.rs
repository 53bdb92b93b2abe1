//! JSON frames exchanged over the realtime socket.

use filmcraft_core::types::DbId;
use filmcraft_events::ChangeTable;
use serde::{Deserialize, Serialize};

/// Frames a client may send.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Subscribe { project_id: DbId },
    Unsubscribe { project_id: DbId },
}

/// Frames the server sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Rows of `table` changed for `project_id`; the client should reload them.
    Invalidate {
        project_id: DbId,
        table: ChangeTable,
    },
    Subscribed { project_id: DbId },
    Unsubscribed { project_id: DbId },
    Error { message: String },
}

impl ServerMessage {
    pub fn to_json(&self) -> String {
        // Serializing these plain enums cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}
