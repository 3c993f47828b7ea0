//! Leaderboard aggregation over `users` and `user_levels`.

use explorers_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::leaderboard::LeaderboardEntry;

/// Read-only leaderboard queries.
pub struct LeaderboardRepo;

impl LeaderboardRepo {
    /// Aggregate solved levels and total solve time per user.
    ///
    /// Only records with `solved_at >= since` count (all solved records when
    /// `since` is `None`). Every user appears, with `0 / 0` when nothing
    /// counts. Ordered by levels solved descending, total time ascending,
    /// then username.
    pub async fn aggregate(
        pool: &PgPool,
        since: Option<Timestamp>,
    ) -> Result<Vec<LeaderboardEntry>, sqlx::Error> {
        sqlx::query_as::<_, LeaderboardEntry>(
            "SELECT u.username,
                    COUNT(ul.level_id) FILTER (WHERE ul.solved_at IS NOT NULL
                        AND ($1::timestamptz IS NULL OR ul.solved_at >= $1)) AS levels_solved,
                    COALESCE(SUM(FLOOR(EXTRACT(EPOCH FROM (ul.solved_at - ul.started_at))))
                        FILTER (WHERE ul.solved_at IS NOT NULL
                            AND ($1::timestamptz IS NULL OR ul.solved_at >= $1)), 0)::BIGINT
                        AS total_time
             FROM users u
             LEFT JOIN user_levels ul ON ul.user_id = u.id
             GROUP BY u.id, u.username
             ORDER BY levels_solved DESC, total_time ASC, u.username ASC",
        )
        .bind(since)
        .fetch_all(pool)
        .await
    }
}
