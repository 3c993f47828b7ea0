//! Route definitions for the `/level` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::levels;
use crate::state::AppState;

/// Routes mounted at `/level`.
///
/// ```text
/// GET  /             -> list_levels
/// GET  /{level_id}   -> get_level
/// POST /{level_id}   -> start_level
/// PUT  /{level_id}   -> solve_level
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(levels::list_levels)).route(
        "/{level_id}",
        get(levels::get_level)
            .post(levels::start_level)
            .put(levels::solve_level),
    )
}
