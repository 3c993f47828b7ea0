use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use explorers_db::models::leaderboard::LeaderboardEntry;

use crate::error::AppResult;
use crate::query::LeaderboardParams;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/leaderboard?timeFilter=week|month|all
///
/// Public. Unknown filters, and query strings that do not parse, fall back
/// to `all`.
pub async fn get_leaderboard(
    State(state): State<AppState>,
    params: Result<Query<LeaderboardParams>, QueryRejection>,
) -> AppResult<Json<ApiResponse<Vec<LeaderboardEntry>>>> {
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "Ignoring leaderboard query");
            LeaderboardParams::default()
        }
    };
    let entries = state
        .progress
        .get_leaderboard(params.time_filter.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(
        "Leaderboard retrieved successfully",
        entries,
    )))
}
