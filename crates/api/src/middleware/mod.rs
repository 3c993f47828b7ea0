//! Request extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the session from a Bearer token.

pub mod auth;
