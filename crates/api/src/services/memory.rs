//! In-memory store for manager unit tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::Utc;
use explorers_core::leaderboard::compare_standings;
use explorers_core::progress::{solve_duration_secs, ProgressState, SolveOutcome, StartOutcome};
use explorers_core::types::{DbId, Timestamp};
use explorers_db::models::leaderboard::LeaderboardEntry;
use explorers_db::models::level::{Level, LevelStatus};
use explorers_db::models::progress::ProgressRecord;
use explorers_db::models::user::{CreateUser, User};

use super::store::{CredentialStore, ProgressStore, StoreError};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    levels: BTreeMap<DbId, Level>,
    progress: BTreeMap<(DbId, DbId), ProgressRecord>,
}

impl Inner {
    fn ensure_user(&self, user_id: DbId) -> Result<(), StoreError> {
        if self.users.iter().any(|u| u.id == user_id) {
            Ok(())
        } else {
            Err(StoreError::MissingReference("user_levels_user_id_fkey".into()))
        }
    }
}

/// Mirrors the PostgreSQL constraints: unique username/email, one progress
/// record per (user, level) and progress only for existing users.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    /// When set, `upsert_start` reports a uniqueness violation, as a store
    /// without `ON CONFLICT` would when two starts race.
    start_conflicts: bool,
}

impl MemoryStore {
    pub fn with_levels(ids: &[DbId]) -> Self {
        let store = Self::default();
        {
            let mut inner = store.inner.lock().unwrap();
            for &id in ids {
                inner.levels.insert(
                    id,
                    Level {
                        level_id: id,
                        name: format!("Level {id}"),
                        description: format!("Description {id}"),
                        difficulty: 1,
                        instructions: "Do the thing".to_string(),
                        starting_state: serde_json::json!({ "name": "/", "children": [] }),
                        solution: serde_json::json!({ "name": "/", "children": ["secret"] }),
                    },
                );
            }
        }
        store
    }

    pub fn with_start_conflicts(mut self) -> Self {
        self.start_conflicts = true;
        self
    }

    pub fn password_hash(&self, username: &str) -> String {
        let inner = self.inner.lock().unwrap();
        inner
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.password_hash.clone())
            .expect("user should exist")
    }

    pub fn record(&self, user_id: DbId, level_id: DbId) -> Option<ProgressRecord> {
        let inner = self.inner.lock().unwrap();
        inner.progress.get(&(user_id, level_id)).cloned()
    }

    pub fn record_count(&self, user_id: DbId) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.progress.keys().filter(|(u, _)| *u == user_id).count()
    }

    /// Write a record with explicit timestamps.
    pub fn put_record(
        &self,
        user_id: DbId,
        level_id: DbId,
        started_at: Timestamp,
        solved_at: Option<Timestamp>,
    ) {
        let mut inner = self.inner.lock().unwrap();
        inner.progress.insert(
            (user_id, level_id),
            ProgressRecord {
                user_id,
                level_id,
                started_at,
                solved_at,
            },
        );
    }
}

impl CredentialStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert(&self, input: &CreateUser) -> Result<User, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.iter().any(|u| u.username == input.username) {
            return Err(StoreError::Duplicate("uq_users_username".into()));
        }
        if inner.users.iter().any(|u| u.email == input.email) {
            return Err(StoreError::Duplicate("uq_users_email".into()));
        }
        let now = Utc::now();
        let user = User {
            id: inner.users.len() as DbId + 1,
            username: input.username.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn update_hash(&self, username: &str, password_hash: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.users.iter_mut().find(|u| u.username == username) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl ProgressStore for MemoryStore {
    async fn list_levels_with_progress(
        &self,
        user_id: DbId,
    ) -> Result<Vec<LevelStatus>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .levels
            .values()
            .map(|level| LevelStatus {
                level_id: level.level_id,
                solved: state_of(inner.progress.get(&(user_id, level.level_id))).listed_as_solved(),
                name: level.name.clone(),
                difficulty: level.difficulty,
            })
            .collect())
    }

    async fn get_level(&self, level_id: DbId) -> Result<Option<Level>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.levels.get(&level_id).cloned())
    }

    async fn upsert_start(
        &self,
        user_id: DbId,
        level_id: DbId,
    ) -> Result<StartOutcome, StoreError> {
        if self.start_conflicts {
            return Err(StoreError::Duplicate("pk_user_levels".into()));
        }
        let mut inner = self.inner.lock().unwrap();
        inner.ensure_user(user_id)?;
        let state = state_of(inner.progress.get(&(user_id, level_id)));
        let outcome = state.on_start();
        if outcome == StartOutcome::Created {
            inner.progress.insert(
                (user_id, level_id),
                ProgressRecord {
                    user_id,
                    level_id,
                    started_at: Utc::now(),
                    solved_at: None,
                },
            );
        }
        Ok(outcome)
    }

    async fn mark_solved(
        &self,
        user_id: DbId,
        level_id: DbId,
    ) -> Result<SolveOutcome, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.ensure_user(user_id)?;
        let now = Utc::now();
        let outcome = state_of(inner.progress.get(&(user_id, level_id))).on_solve();
        match outcome {
            SolveOutcome::SolvedWithoutStart => {
                inner.progress.insert(
                    (user_id, level_id),
                    ProgressRecord {
                        user_id,
                        level_id,
                        started_at: now,
                        solved_at: Some(now),
                    },
                );
            }
            SolveOutcome::Solved => {
                if let Some(record) = inner.progress.get_mut(&(user_id, level_id)) {
                    record.solved_at = Some(now);
                }
            }
            SolveOutcome::AlreadySolved => {}
        }
        Ok(outcome)
    }

    async fn aggregate_leaderboard(
        &self,
        since: Option<Timestamp>,
    ) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut entries: Vec<LeaderboardEntry> = inner
            .users
            .iter()
            .map(|user| {
                let counted = inner.progress.values().filter(|r| {
                    r.user_id == user.id
                        && r.solved_at.is_some_and(|at| since.map_or(true, |s| at >= s))
                });
                let (levels_solved, total_time) = counted.fold((0, 0), |(n, t), r| {
                    let solved_at = r.solved_at.unwrap_or(r.started_at);
                    (n + 1, t + solve_duration_secs(r.started_at, solved_at))
                });
                LeaderboardEntry {
                    username: user.username.clone(),
                    levels_solved,
                    total_time,
                }
            })
            .collect();
        entries.sort_by(|a, b| {
            compare_standings(
                (a.levels_solved, a.total_time, &a.username),
                (b.levels_solved, b.total_time, &b.username),
            )
        });
        Ok(entries)
    }
}

fn state_of(record: Option<&ProgressRecord>) -> ProgressState {
    record.map_or(ProgressState::NotStarted, ProgressRecord::state)
}
