//! Domain types and pure logic shared by the storage and HTTP layers.
//!
//! Nothing in this crate touches the database or the network.

pub mod error;
pub mod leaderboard;
pub mod progress;
pub mod types;
pub mod validation;
