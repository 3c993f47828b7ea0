//! Domain managers and the storage seam they run on.
//!
//! - [`auth::AuthManager`] -- registration, login and password change.
//! - [`progress::ProgressManager`] -- level listing, start/solve, leaderboard.
//! - [`store`] -- the traits both managers are generic over.
//! - [`pg::PgStore`] -- the PostgreSQL implementation.

pub mod auth;
#[cfg(test)]
pub(crate) mod memory;
pub mod pg;
pub mod progress;
pub mod store;
