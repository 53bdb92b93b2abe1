use std::sync::Arc;

use axum::extract::ws::Message;
use filmcraft_events::ChangeEvent;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::ws::{ServerMessage, WsManager};

/// Forwards change events to the WebSocket clients subscribed to the
/// affected project.
pub struct RealtimeRelay {
    ws_manager: Arc<WsManager>,
}

impl RealtimeRelay {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the relay loop until the event bus is dropped or `cancel` fires.
    ///
    /// Lagging only drops invalidations; clients catch up on the next one.
    pub async fn run(
        self,
        mut receiver: broadcast::Receiver<ChangeEvent>,
        cancel: CancellationToken,
    ) {
        loop {
            let received = tokio::select! {
                () = cancel.cancelled() => {
                    tracing::info!("Realtime relay cancelled");
                    break;
                }
                received = receiver.recv() => received,
            };
            match received {
                Ok(event) => {
                    self.relay(&event).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Realtime relay lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, realtime relay shutting down");
                    break;
                }
            }
        }
    }

    /// Push one invalidation. Returns the number of connections reached.
    pub async fn relay(&self, event: &ChangeEvent) -> usize {
        let frame = ServerMessage::Invalidate {
            project_id: event.project_id,
            table: event.table,
        };
        let delivered = self
            .ws_manager
            .send_to_project(event.project_id, Message::Text(frame.to_json().into()))
            .await;
        tracing::debug!(
            project_id = event.project_id,
            table = event.table.as_str(),
            delivered,
            "Relayed change event"
        );
        delivered
    }
}
