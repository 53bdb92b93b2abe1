//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use filmcraft_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// ChangeTable
// ---------------------------------------------------------------------------

/// The table whose rows changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeTable {
    Projects,
    Scenes,
    Shots,
    Comments,
    Collaborators,
}

impl ChangeTable {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Scenes => "scenes",
            Self::Shots => "shots",
            Self::Comments => "comments",
            Self::Collaborators => "collaborators",
        }
    }
}

// ---------------------------------------------------------------------------
// ChangeEvent
// ---------------------------------------------------------------------------

/// Something changed in `table` for `project_id`.
///
/// Events carry no row data. Receivers are expected to reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub project_id: DbId,
    pub table: ChangeTable,
    /// The user whose request caused the change.
    pub actor_user_id: Option<DbId>,
    pub timestamp: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(project_id: DbId, table: ChangeTable) -> Self {
        Self {
            project_id,
            table,
            actor_user_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use filmcraft_events::bus::{ChangeEvent, ChangeTable, EventBus};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(ChangeEvent::new(1, ChangeTable::Shots));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<ChangeEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest unconsumed events are dropped and
    /// slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers. Dropped if there are none.
    pub fn publish(&self, event: ChangeEvent) {
        tracing::trace!(
            project_id = event.project_id,
            table = event.table.as_str(),
            "Publishing change event"
        );
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
