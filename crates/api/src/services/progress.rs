//! Level access, progress transitions and the leaderboard.

use chrono::Utc;
use explorers_core::error::CoreError;
use explorers_core::leaderboard::TimeWindow;
use explorers_core::progress::StartOutcome;
use explorers_core::types::DbId;
use explorers_db::models::leaderboard::LeaderboardEntry;
use explorers_db::models::level::{LevelData, LevelStatus};

use super::store::{ProgressStore, StoreError};
use crate::auth::jwt::SessionClaims;

/// Drives the per-user level state machine on top of a [`ProgressStore`].
pub struct ProgressManager<S> {
    store: S,
}

impl<S: ProgressStore> ProgressManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Every level, ordered by id, with the caller's solved flag.
    pub async fn list_levels(
        &self,
        identity: &SessionClaims,
    ) -> Result<Vec<LevelStatus>, CoreError> {
        Ok(self
            .store
            .list_levels_with_progress(identity.user_id)
            .await?)
    }

    /// Level content for play. The solution is never part of the result.
    pub async fn get_level_data(
        &self,
        _identity: &SessionClaims,
        level_id: DbId,
    ) -> Result<LevelData, CoreError> {
        let level = self
            .store
            .get_level(level_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Level",
                id: level_id,
            })?;
        Ok(LevelData::from(level))
    }

    /// Record that the caller started a level. Starting twice is a no-op.
    #[tracing::instrument(skip(self, identity), fields(user_id = identity.user_id))]
    pub async fn start_level(
        &self,
        identity: &SessionClaims,
        level_id: DbId,
    ) -> Result<Vec<LevelStatus>, CoreError> {
        self.ensure_level(level_id).await?;

        let outcome = match self.store.upsert_start(identity.user_id, level_id).await {
            Ok(outcome) => outcome,
            // A concurrent start won the insert.
            Err(StoreError::Duplicate(_)) => StartOutcome::AlreadyStarted,
            Err(e) => return Err(write_error(e)),
        };
        tracing::info!(?outcome, "Level start recorded");

        self.list_levels(identity).await
    }

    /// Record that the caller solved a level.
    ///
    /// Solving without a prior start records a zero-duration attempt. The
    /// first `solved_at` is kept on later solves.
    #[tracing::instrument(skip(self, identity), fields(user_id = identity.user_id))]
    pub async fn solve_level(
        &self,
        identity: &SessionClaims,
        level_id: DbId,
    ) -> Result<Vec<LevelStatus>, CoreError> {
        self.ensure_level(level_id).await?;

        let outcome = self
            .store
            .mark_solved(identity.user_id, level_id)
            .await
            .map_err(write_error)?;
        tracing::info!(?outcome, "Level solve recorded");

        self.list_levels(identity).await
    }

    /// Standings for `time_filter` (`week`, `month` or `all`). Unrecognised or
    /// missing filters mean `all`.
    pub async fn get_leaderboard(
        &self,
        time_filter: Option<&str>,
    ) -> Result<Vec<LeaderboardEntry>, CoreError> {
        let window = TimeWindow::parse(time_filter);
        tracing::debug!(window = window.as_str(), "Building leaderboard");
        Ok(self
            .store
            .aggregate_leaderboard(window.since(Utc::now()))
            .await?)
    }

    async fn ensure_level(&self, level_id: DbId) -> Result<(), CoreError> {
        match self.store.get_level(level_id).await? {
            Some(_) => Ok(()),
            None => Err(CoreError::NotFound {
                entity: "Level",
                id: level_id,
            }),
        }
    }
}

/// The level was checked before the write, so a missing reference means the
/// session names a user that no longer exists.
fn write_error(err: StoreError) -> CoreError {
    match err {
        StoreError::MissingReference(constraint) => {
            tracing::debug!(%constraint, "Progress write for unknown user");
            CoreError::Unauthenticated("Session user no longer exists".into())
        }
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Duration;
    use explorers_db::models::user::CreateUser;

    use super::*;
    use crate::services::memory::MemoryStore;
    use crate::services::store::CredentialStore;

    fn claims(user_id: DbId, username: &str) -> SessionClaims {
        SessionClaims {
            sub: username.to_string(),
            user_id,
            username: username.to_string(),
            email: format!("{username}@x.com"),
            iss: "file-explorers".to_string(),
            aud: "file-explorers".to_string(),
            iat: 0,
            nbf: 0,
            exp: i64::MAX,
            jti: "test".to_string(),
        }
    }

    async fn add_user(store: &MemoryStore, username: &str) -> SessionClaims {
        let user = store
            .insert(&CreateUser {
                username: username.to_string(),
                email: format!("{username}@x.com"),
                password_hash: "unused".to_string(),
            })
            .await
            .unwrap();
        claims(user.id, username)
    }

    #[tokio::test]
    async fn listing_is_ordered_and_unsolved_for_new_user() {
        let manager = ProgressManager::new(MemoryStore::with_levels(&[3, 1, 2]));
        let alice = add_user(&manager.store, "alice").await;

        let levels = manager.list_levels(&alice).await.unwrap();
        let ids: Vec<DbId> = levels.iter().map(|l| l.level_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(levels.iter().all(|l| !l.solved));
    }

    #[tokio::test]
    async fn level_data_hides_solution() {
        let manager = ProgressManager::new(MemoryStore::with_levels(&[1]));
        let alice = add_user(&manager.store, "alice").await;

        let data = manager.get_level_data(&alice, 1).await.unwrap();
        let json = serde_json::to_value(&data).unwrap();
        assert!(json.get("solution").is_none());
        assert!(!json.to_string().contains("secret"));
        assert_eq!(json["starting_state"]["name"], "/");
    }

    #[tokio::test]
    async fn unknown_level_is_not_found() {
        let manager = ProgressManager::new(MemoryStore::with_levels(&[1]));
        let alice = add_user(&manager.store, "alice").await;

        assert_matches!(
            manager.get_level_data(&alice, 99).await,
            Err(CoreError::NotFound { entity: "Level", id: 99 })
        );
        assert_matches!(
            manager.start_level(&alice, 99).await,
            Err(CoreError::NotFound { .. })
        );
        assert_matches!(
            manager.solve_level(&alice, 99).await,
            Err(CoreError::NotFound { .. })
        );
        assert_eq!(manager.store.record_count(alice.user_id), 0);
    }

    #[tokio::test]
    async fn start_twice_keeps_one_record() {
        let manager = ProgressManager::new(MemoryStore::with_levels(&[1, 2]));
        let alice = add_user(&manager.store, "alice").await;

        manager.start_level(&alice, 1).await.unwrap();
        let first = manager.store.record(alice.user_id, 1).unwrap();
        let levels = manager.start_level(&alice, 1).await.unwrap();

        assert_eq!(manager.store.record_count(alice.user_id), 1);
        assert_eq!(manager.store.record(alice.user_id, 1).unwrap(), first);
        assert!(levels[0].solved, "started levels list as solved");
        assert!(!levels[1].solved);
    }

    #[tokio::test]
    async fn racing_start_is_not_an_error() {
        let manager = ProgressManager::new(MemoryStore::with_levels(&[1]).with_start_conflicts());
        let alice = add_user(&manager.store, "alice").await;

        assert!(manager.start_level(&alice, 1).await.is_ok());
    }

    #[tokio::test]
    async fn writes_for_deleted_user_are_unauthenticated() {
        let manager = ProgressManager::new(MemoryStore::with_levels(&[1]));
        let ghost = claims(404, "ghost");

        assert_matches!(
            manager.start_level(&ghost, 1).await,
            Err(CoreError::Unauthenticated(_))
        );
        assert_matches!(
            manager.solve_level(&ghost, 1).await,
            Err(CoreError::Unauthenticated(_))
        );
        assert_eq!(manager.store.record_count(404), 0);
    }

    #[tokio::test]
    async fn solve_after_start_sets_solved_at() {
        let manager = ProgressManager::new(MemoryStore::with_levels(&[1]));
        let alice = add_user(&manager.store, "alice").await;

        manager.start_level(&alice, 1).await.unwrap();
        let levels = manager.solve_level(&alice, 1).await.unwrap();

        let record = manager.store.record(alice.user_id, 1).unwrap();
        let solved_at = record.solved_at.expect("solved_at should be set");
        assert!(solved_at >= record.started_at);
        assert!(levels[0].solved);
    }

    #[tokio::test]
    async fn solve_without_start_records_zero_duration() {
        let manager = ProgressManager::new(MemoryStore::with_levels(&[1]));
        let alice = add_user(&manager.store, "alice").await;

        manager.solve_level(&alice, 1).await.unwrap();

        let record = manager.store.record(alice.user_id, 1).unwrap();
        assert_eq!(record.solved_at, Some(record.started_at));

        let board = manager.get_leaderboard(None).await.unwrap();
        assert_eq!(board[0].levels_solved, 1);
        assert_eq!(board[0].total_time, 0);
    }

    #[tokio::test]
    async fn solved_at_never_moves_or_clears() {
        let manager = ProgressManager::new(MemoryStore::with_levels(&[1]));
        let alice = add_user(&manager.store, "alice").await;

        manager.start_level(&alice, 1).await.unwrap();
        manager.solve_level(&alice, 1).await.unwrap();
        let solved = manager.store.record(alice.user_id, 1).unwrap();

        manager.start_level(&alice, 1).await.unwrap();
        manager.solve_level(&alice, 1).await.unwrap();

        assert_eq!(manager.store.record(alice.user_id, 1).unwrap(), solved);
    }

    #[tokio::test]
    async fn progress_is_per_user() {
        let manager = ProgressManager::new(MemoryStore::with_levels(&[1]));
        let alice = add_user(&manager.store, "alice").await;
        let bob = add_user(&manager.store, "bob").await;

        manager.start_level(&alice, 1).await.unwrap();

        assert!(manager.list_levels(&alice).await.unwrap()[0].solved);
        assert!(!manager.list_levels(&bob).await.unwrap()[0].solved);
    }

    #[tokio::test]
    async fn zero_solve_user_appears_on_leaderboard() {
        let manager = ProgressManager::new(MemoryStore::with_levels(&[1]));
        add_user(&manager.store, "carol").await;

        let board = manager.get_leaderboard(Some("all")).await.unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].username, "carol");
        assert_eq!(board[0].levels_solved, 0);
        assert_eq!(board[0].total_time, 0);
    }

    #[tokio::test]
    async fn faster_user_ranks_first_on_equal_solves() {
        let manager = ProgressManager::new(MemoryStore::with_levels(&[1, 2]));
        let a = add_user(&manager.store, "a").await;
        let b = add_user(&manager.store, "b").await;
        let t0 = Utc::now() - Duration::hours(1);

        manager
            .store
            .put_record(a.user_id, 1, t0, Some(t0 + Duration::seconds(60)));
        manager
            .store
            .put_record(a.user_id, 2, t0, Some(t0 + Duration::seconds(40)));
        manager
            .store
            .put_record(b.user_id, 1, t0, Some(t0 + Duration::seconds(30)));
        manager
            .store
            .put_record(b.user_id, 2, t0, Some(t0 + Duration::seconds(20)));

        let board = manager.get_leaderboard(None).await.unwrap();
        assert_eq!(board[0].username, "b");
        assert_eq!(board[0].total_time, 50);
        assert_eq!(board[1].username, "a");
        assert_eq!(board[1].total_time, 100);
    }

    #[tokio::test]
    async fn leaderboard_window_filters_old_solves() {
        let manager = ProgressManager::new(MemoryStore::with_levels(&[1, 2]));
        let alice = add_user(&manager.store, "alice").await;
        let old = Utc::now() - Duration::days(20);
        let recent = Utc::now() - Duration::days(1);

        manager
            .store
            .put_record(alice.user_id, 1, old, Some(old + Duration::seconds(10)));
        manager
            .store
            .put_record(alice.user_id, 2, recent, Some(recent + Duration::seconds(5)));

        let week = manager.get_leaderboard(Some("week")).await.unwrap();
        assert_eq!((week[0].levels_solved, week[0].total_time), (1, 5));

        let month = manager.get_leaderboard(Some("month")).await.unwrap();
        assert_eq!((month[0].levels_solved, month[0].total_time), (2, 15));

        let unknown = manager.get_leaderboard(Some("decade")).await.unwrap();
        assert_eq!(unknown[0].levels_solved, 2);
    }

    #[tokio::test]
    async fn started_only_levels_do_not_count() {
        let manager = ProgressManager::new(MemoryStore::with_levels(&[1]));
        let alice = add_user(&manager.store, "alice").await;

        manager.start_level(&alice, 1).await.unwrap();

        let board = manager.get_leaderboard(None).await.unwrap();
        assert_eq!(board[0].levels_solved, 0);
    }
}
