//! Leaderboard windows and ranking order.

use std::cmp::Ordering;

use chrono::Duration;
use serde::Serialize;

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Length of the `week` window in days.
pub const WEEK_DAYS: i64 = 7;

/// Length of the `month` window in days.
pub const MONTH_DAYS: i64 = 30;

// ---------------------------------------------------------------------------
// Time window
// ---------------------------------------------------------------------------

/// Time range restricting which solves count toward the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    Week,
    Month,
    #[default]
    All,
}

impl TimeWindow {
    /// Parse a `timeFilter` value. Unknown or missing values mean [`TimeWindow::All`].
    pub fn parse(filter: Option<&str>) -> Self {
        match filter.map(str::trim) {
            Some("week") => Self::Week,
            Some("month") => Self::Month,
            _ => Self::All,
        }
    }

    /// Earliest `solved_at` that still counts, or `None` for no lower bound.
    pub fn since(self, now: Timestamp) -> Option<Timestamp> {
        match self {
            Self::Week => Some(now - Duration::days(WEEK_DAYS)),
            Self::Month => Some(now - Duration::days(MONTH_DAYS)),
            Self::All => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::All => "all",
        }
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Ranking order: more levels first, then less total time, then username.
///
/// The leaderboard query's `ORDER BY` sorts the same way.
pub fn compare_standings(
    (solved_a, time_a, name_a): (i64, i64, &str),
    (solved_b, time_b, name_b): (i64, i64, &str),
) -> Ordering {
    solved_b
        .cmp(&solved_a)
        .then(time_a.cmp(&time_b))
        .then_with(|| name_a.cmp(name_b))
}
