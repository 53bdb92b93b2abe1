//! FilmCraft change-notification bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`ChangeEvent`]: "rows of this table changed for this project".
//!
//! The API publishes a [`ChangeEvent`] after every successful mutation and
//! the realtime relay turns them into invalidation frames for subscribed
//! clients.

pub mod bus;

pub use bus::{ChangeEvent, ChangeTable, EventBus};
