//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod leaderboard_repo;
pub mod level_repo;
pub mod progress_repo;
pub mod user_repo;

pub use leaderboard_repo::LeaderboardRepo;
pub use level_repo::LevelRepo;
pub use progress_repo::ProgressRepo;
pub use user_repo::UserRepo;
