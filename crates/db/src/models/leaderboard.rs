//! Leaderboard aggregate rows.

use serde::Serialize;
use sqlx::FromRow;

/// Aggregated standing of one user within a leaderboard window.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct LeaderboardEntry {
    pub username: String,
    /// Number of levels solved inside the window.
    pub levels_solved: i64,
    /// Sum of `solved_at - started_at` in whole seconds over those levels.
    pub total_time: i64,
}
