//! Repository for the `user_levels` progress table.
//!
//! Every write is a single `INSERT ... ON CONFLICT` statement so concurrent
//! requests for the same (user, level) resolve against the primary key.

use explorers_core::progress::{SolveOutcome, StartOutcome};
use explorers_core::types::DbId;
use sqlx::PgPool;

use crate::models::progress::ProgressRecord;

const COLUMNS: &str = "user_id, level_id, started_at, solved_at";

/// Start/solve transitions for progress records.
pub struct ProgressRepo;

impl ProgressRepo {
    /// Fetch the record for `(user_id, level_id)`, if any.
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        level_id: DbId,
    ) -> Result<Option<ProgressRecord>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM user_levels WHERE user_id = $1 AND level_id = $2");
        sqlx::query_as::<_, ProgressRecord>(&query)
            .bind(user_id)
            .bind(level_id)
            .fetch_optional(pool)
            .await
    }

    /// Record that a user started a level. Existing records are left untouched.
    pub async fn start(
        pool: &PgPool,
        user_id: DbId,
        level_id: DbId,
    ) -> Result<StartOutcome, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO user_levels (user_id, level_id, started_at)
             VALUES ($1, $2, NOW())
             ON CONFLICT (user_id, level_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(level_id)
        .execute(pool)
        .await?;

        Ok(if result.rows_affected() > 0 {
            StartOutcome::Created
        } else {
            StartOutcome::AlreadyStarted
        })
    }

    /// Record that a user solved a level.
    ///
    /// - No record: insert one with `started_at = solved_at = NOW()`.
    /// - Started: set `solved_at = NOW()`.
    /// - Already solved: no change; the first solve time is kept.
    pub async fn solve(
        pool: &PgPool,
        user_id: DbId,
        level_id: DbId,
    ) -> Result<SolveOutcome, sqlx::Error> {
        // `xmax = 0` holds only for freshly inserted tuples.
        let row: Option<(bool,)> = sqlx::query_as(
            "INSERT INTO user_levels (user_id, level_id, started_at, solved_at)
             VALUES ($1, $2, NOW(), NOW())
             ON CONFLICT (user_id, level_id) DO UPDATE
                 SET solved_at = EXCLUDED.solved_at
                 WHERE user_levels.solved_at IS NULL
             RETURNING (xmax = 0) AS inserted",
        )
        .bind(user_id)
        .bind(level_id)
        .fetch_optional(pool)
        .await?;

        Ok(match row {
            Some((true,)) => SolveOutcome::SolvedWithoutStart,
            Some((false,)) => SolveOutcome::Solved,
            None => SolveOutcome::AlreadySolved,
        })
    }
}
