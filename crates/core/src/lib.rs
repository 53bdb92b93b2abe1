//! FilmCraft domain core.
//!
//! Pure domain logic with no I/O: identifiers, errors, project phases, wizard
//! step predicates, script segmentation, and the shot / scene / chat /
//! collaboration / storage rules shared by the database and API layers.

pub mod chat;
pub mod collaboration;
pub mod error;
pub mod phase;
pub mod planning;
pub mod scenes;
pub mod script;
pub mod shots;
pub mod storage;
pub mod types;
pub mod wizard;
