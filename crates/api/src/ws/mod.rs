//! WebSocket infrastructure for the realtime invalidation channel.
//!
//! Provides connection management with per-project subscriptions, heartbeat
//! monitoring, the wire message types, and the HTTP upgrade handler.

mod handler;
mod heartbeat;
pub mod manager;
pub mod messages;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
pub use messages::{ClientMessage, ServerMessage};
