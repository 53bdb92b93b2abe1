//! Realtime change propagation.
//!
//! [`relay::RealtimeRelay`] turns [`ChangeEvent`](filmcraft_events::ChangeEvent)s
//! from the event bus into `invalidate` frames for subscribed WebSocket clients.

pub mod relay;

pub use relay::RealtimeRelay;
