//! Progress record model for the `user_levels` table.

use explorers_core::progress::ProgressState;
use explorers_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A user's start/solve timestamps for one level.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct ProgressRecord {
    pub user_id: DbId,
    pub level_id: DbId,
    pub started_at: Timestamp,
    pub solved_at: Option<Timestamp>,
}

impl ProgressRecord {
    /// The state this record puts the level in for its user.
    pub fn state(&self) -> ProgressState {
        ProgressState::from_timestamps(Some(self.started_at), self.solved_at)
    }
}
