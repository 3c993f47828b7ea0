//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for `GET /leaderboard` (`?timeFilter=week|month|all`).
///
/// Any other value, or none, is treated as `all` by the progress manager.
#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardParams {
    #[serde(rename = "timeFilter")]
    pub time_filter: Option<String>,
}
