//! Level entity model and its client projections.

use explorers_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// Full level row from the `levels` table, including the solution.
#[derive(Debug, Clone, FromRow)]
pub struct Level {
    pub level_id: DbId,
    pub name: String,
    pub description: String,
    pub difficulty: i32,
    pub instructions: String,
    /// Opaque puzzle payload, passed through verbatim.
    pub starting_state: serde_json::Value,
    /// Opaque solution payload. Never leaves the server.
    pub solution: serde_json::Value,
}

/// Level content returned to clients. Has no solution field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelData {
    pub level_id: DbId,
    pub name: String,
    pub description: String,
    pub difficulty: i32,
    pub instructions: String,
    pub starting_state: serde_json::Value,
}

impl From<Level> for LevelData {
    fn from(level: Level) -> Self {
        Self {
            level_id: level.level_id,
            name: level.name,
            description: level.description,
            difficulty: level.difficulty,
            instructions: level.instructions,
            starting_state: level.starting_state,
        }
    }
}

/// One row of the level listing for a given user.
///
/// `solved` is true once the user has any progress record for the level,
/// whether only started or actually solved.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct LevelStatus {
    pub level_id: DbId,
    pub solved: bool,
    pub name: String,
    pub difficulty: i32,
}
