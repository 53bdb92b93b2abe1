//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod chat_read_status_repo;
pub mod collaborator_repo;
pub mod comment_repo;
pub mod project_repo;
pub mod scene_repo;
pub mod session_repo;
pub mod shot_repo;
pub mod user_repo;

pub use chat_read_status_repo::ChatReadStatusRepo;
pub use collaborator_repo::CollaboratorRepo;
pub use comment_repo::CommentRepo;
pub use project_repo::ProjectRepo;
pub use scene_repo::SceneRepo;
pub use session_repo::SessionRepo;
pub use shot_repo::ShotRepo;
pub use user_repo::UserRepo;
