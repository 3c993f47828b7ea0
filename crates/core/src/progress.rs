//! Per-user, per-level progress state machine.
//!
//! A progress record moves `NotStarted -> Started -> Solved`. `Solved` is
//! terminal: no transition clears `solved_at` or moves it later.
//!
//! The PostgreSQL repositories apply these transitions inside single SQL
//! statements. The helpers here state the same rules for stores that run
//! them in process.

use serde::Serialize;

use crate::types::Timestamp;

/// Where a user stands on a single level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressState {
    NotStarted,
    Started,
    Solved,
}

impl ProgressState {
    /// Derive the state from the stored timestamps of a (possibly absent) record.
    pub fn from_timestamps(started_at: Option<Timestamp>, solved_at: Option<Timestamp>) -> Self {
        match (started_at, solved_at) {
            (_, Some(_)) => Self::Solved,
            (Some(_), None) => Self::Started,
            (None, None) => Self::NotStarted,
        }
    }

    /// Whether the summary listing shows the level as done.
    ///
    /// The listing collapses `Started` and `Solved` into one flag.
    pub fn listed_as_solved(self) -> bool {
        !matches!(self, Self::NotStarted)
    }

    /// The effect a start request has from this state.
    pub fn on_start(self) -> StartOutcome {
        match self {
            Self::NotStarted => StartOutcome::Created,
            Self::Started | Self::Solved => StartOutcome::AlreadyStarted,
        }
    }

    /// The effect a solve request has from this state.
    ///
    /// Solving without a prior start creates a zero-duration record.
    pub fn on_solve(self) -> SolveOutcome {
        match self {
            Self::NotStarted => SolveOutcome::SolvedWithoutStart,
            Self::Started => SolveOutcome::Solved,
            Self::Solved => SolveOutcome::AlreadySolved,
        }
    }
}

/// Result of a start transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StartOutcome {
    /// A new record was written with `started_at = now`.
    Created,
    /// A record already existed; nothing changed.
    AlreadyStarted,
}

/// Result of a solve transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveOutcome {
    /// An existing started record received `solved_at = now`.
    Solved,
    /// No record existed; one was written with `started_at = solved_at = now`.
    SolvedWithoutStart,
    /// The record was already solved; the first `solved_at` is kept.
    AlreadySolved,
}

/// Whole seconds spent between start and solve, never negative.
pub fn solve_duration_secs(started_at: Timestamp, solved_at: Timestamp) -> i64 {
    (solved_at - started_at).num_seconds().max(0)
}
