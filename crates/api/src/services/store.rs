//! Storage interfaces used by the auth and progress managers.
//!
//! The managers only see these traits; [`super::pg::PgStore`] backs them with
//! PostgreSQL in production.

use std::future::Future;

use explorers_core::error::CoreError;
use explorers_core::progress::{SolveOutcome, StartOutcome};
use explorers_core::types::{DbId, Timestamp};
use explorers_db::models::leaderboard::LeaderboardEntry;
use explorers_db::models::level::{Level, LevelStatus};
use explorers_db::models::user::{CreateUser, User};

/// Failure reported by a store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("Duplicate value violates unique constraint: {0}")]
    Duplicate(String),

    /// A write referenced a row that does not exist.
    #[error("Referenced row does not exist: {0}")]
    MissingReference(String),

    /// Any other storage failure.
    #[error("Store failure: {0}")]
    Backend(String),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        CoreError::Internal(err.to_string())
    }
}

/// Persistence for user identity and password hashes.
pub trait CredentialStore: Send + Sync {
    /// Look up a user by exact username.
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;

    /// Insert a user. Fails with [`StoreError::Duplicate`] when the username
    /// or email is taken.
    fn insert(&self, input: &CreateUser) -> impl Future<Output = Result<User, StoreError>> + Send;

    /// Replace the stored hash. Returns `false` when no such user exists.
    fn update_hash(
        &self,
        username: &str,
        password_hash: &str,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

/// Persistence for levels and per-user progress records.
pub trait ProgressStore: Send + Sync {
    /// All levels with the user's collapsed solved flag, ordered by level id.
    fn list_levels_with_progress(
        &self,
        user_id: DbId,
    ) -> impl Future<Output = Result<Vec<LevelStatus>, StoreError>> + Send;

    fn get_level(
        &self,
        level_id: DbId,
    ) -> impl Future<Output = Result<Option<Level>, StoreError>> + Send;

    /// Create the progress record if absent. Must be idempotent.
    fn upsert_start(
        &self,
        user_id: DbId,
        level_id: DbId,
    ) -> impl Future<Output = Result<StartOutcome, StoreError>> + Send;

    /// Set `solved_at`, creating a zero-duration record when none exists.
    /// An already solved record is left unchanged.
    fn mark_solved(
        &self,
        user_id: DbId,
        level_id: DbId,
    ) -> impl Future<Output = Result<SolveOutcome, StoreError>> + Send;

    /// Per-user standings counting solves at or after `since`, ranked.
    fn aggregate_leaderboard(
        &self,
        since: Option<Timestamp>,
    ) -> impl Future<Output = Result<Vec<LeaderboardEntry>, StoreError>> + Send;
}
