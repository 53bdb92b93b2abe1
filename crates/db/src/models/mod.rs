//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches, where rows are patchable

pub mod chat_read_status;
pub mod collaborator;
pub mod comment;
pub mod project;
pub mod scene;
pub mod session;
pub mod shot;
pub mod user;
