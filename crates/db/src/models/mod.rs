//! Domain model structs and DTOs.
//!
//! Row structs derive `FromRow`; client-facing projections derive `Serialize`
//! and never carry secrets (password hashes, level solutions).

pub mod leaderboard;
pub mod level;
pub mod progress;
pub mod user;
