//! PostgreSQL-backed store built on the `explorers-db` repositories.

use explorers_core::progress::{SolveOutcome, StartOutcome};
use explorers_core::types::{DbId, Timestamp};
use explorers_db::models::leaderboard::LeaderboardEntry;
use explorers_db::models::level::{Level, LevelStatus};
use explorers_db::models::user::{CreateUser, User};
use explorers_db::repositories::{LeaderboardRepo, LevelRepo, ProgressRepo, UserRepo};
use explorers_db::DbPool;

use super::store::{CredentialStore, ProgressStore, StoreError};

/// Both stores over one connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(constraint) = explorers_db::unique_violation(&err) {
            return StoreError::Duplicate(constraint.to_string());
        }
        if let Some(constraint) = explorers_db::foreign_key_violation(&err) {
            return StoreError::MissingReference(constraint.to_string());
        }
        tracing::error!(error = %err, "Database error");
        StoreError::Backend(err.to_string())
    }
}

impl CredentialStore for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_username(&self.pool, username).await?)
    }

    async fn insert(&self, input: &CreateUser) -> Result<User, StoreError> {
        Ok(UserRepo::create(&self.pool, input).await?)
    }

    async fn update_hash(&self, username: &str, password_hash: &str) -> Result<bool, StoreError> {
        Ok(UserRepo::update_password_hash(&self.pool, username, password_hash).await?)
    }
}

impl ProgressStore for PgStore {
    async fn list_levels_with_progress(
        &self,
        user_id: DbId,
    ) -> Result<Vec<LevelStatus>, StoreError> {
        Ok(LevelRepo::list_with_progress(&self.pool, user_id).await?)
    }

    async fn get_level(&self, level_id: DbId) -> Result<Option<Level>, StoreError> {
        Ok(LevelRepo::find_by_id(&self.pool, level_id).await?)
    }

    async fn upsert_start(
        &self,
        user_id: DbId,
        level_id: DbId,
    ) -> Result<StartOutcome, StoreError> {
        Ok(ProgressRepo::start(&self.pool, user_id, level_id).await?)
    }

    async fn mark_solved(
        &self,
        user_id: DbId,
        level_id: DbId,
    ) -> Result<SolveOutcome, StoreError> {
        Ok(ProgressRepo::solve(&self.pool, user_id, level_id).await?)
    }

    async fn aggregate_leaderboard(
        &self,
        since: Option<Timestamp>,
    ) -> Result<Vec<LeaderboardEntry>, StoreError> {
        Ok(LeaderboardRepo::aggregate(&self.pool, since).await?)
    }
}
