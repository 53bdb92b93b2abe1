//! Authentication and authorization helpers for Axum handlers.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`access`] -- Resolves a user's permissions on a project (owner or collaborator).

pub mod access;
pub mod auth;
