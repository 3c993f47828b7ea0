pub mod auth;
pub mod health;
pub mod leaderboard;
pub mod levels;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                      login (public)
/// /auth/register                   register (public)
/// /auth/change-password            change password (public, old password checked)
///
/// /level                           list levels with solved flags (requires auth)
/// /level/{level_id}                get (GET), start (POST), solve (PUT)
///
/// /leaderboard                     standings, ?timeFilter=week|month|all (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/level", levels::router())
        .nest("/leaderboard", leaderboard::router())
}
