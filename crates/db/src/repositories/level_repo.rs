//! Repository for the read-only `levels` table.

use explorers_core::types::DbId;
use sqlx::PgPool;

use crate::models::level::{Level, LevelStatus};

const COLUMNS: &str =
    "level_id, name, description, difficulty, instructions, starting_state, solution";

/// Read access to levels and per-user listing.
pub struct LevelRepo;

impl LevelRepo {
    /// Find a level by id, including its solution.
    pub async fn find_by_id(pool: &PgPool, level_id: DbId) -> Result<Option<Level>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM levels WHERE level_id = $1");
        sqlx::query_as::<_, Level>(&query)
            .bind(level_id)
            .fetch_optional(pool)
            .await
    }

    /// List every level with a flag telling whether `user_id` has a progress
    /// record for it, ordered by `level_id`.
    pub async fn list_with_progress(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<LevelStatus>, sqlx::Error> {
        sqlx::query_as::<_, LevelStatus>(
            "SELECT l.level_id,
                    (ul.level_id IS NOT NULL) AS solved,
                    l.name,
                    l.difficulty
             FROM levels l
             LEFT JOIN user_levels ul ON ul.level_id = l.level_id AND ul.user_id = $1
             ORDER BY l.level_id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
