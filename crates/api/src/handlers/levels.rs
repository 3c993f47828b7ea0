//! Handlers for the `/level` resource.
//!
//! Every handler requires a session; the caller's identity comes from the
//! [`AuthUser`] extractor.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use explorers_core::types::DbId;
use explorers_db::models::level::{LevelData, LevelStatus};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/level
pub async fn list_levels(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> AppResult<Json<ApiResponse<Vec<LevelStatus>>>> {
    let levels = state.progress.list_levels(&claims).await?;
    Ok(Json(ApiResponse::ok("Levels retrieved successfully", levels)))
}

/// GET /api/v1/level/{level_id}
pub async fn get_level(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    level_id: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<ApiResponse<LevelData>>> {
    let Path(level_id) = level_id?;
    let data = state.progress.get_level_data(&claims, level_id).await?;
    Ok(Json(ApiResponse::ok("Level data retrieved successfully", data)))
}

/// POST /api/v1/level/{level_id}
///
/// Start the level. Returns the refreshed listing.
pub async fn start_level(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    level_id: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<ApiResponse<Vec<LevelStatus>>>> {
    let Path(level_id) = level_id?;
    let levels = state.progress.start_level(&claims, level_id).await?;
    Ok(Json(ApiResponse::ok(
        "Level marked as started successfully",
        levels,
    )))
}

/// PUT /api/v1/level/{level_id}
///
/// Mark the level solved. Returns the refreshed listing.
pub async fn solve_level(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    level_id: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<ApiResponse<Vec<LevelStatus>>>> {
    let Path(level_id) = level_id?;
    let levels = state.progress.solve_level(&claims, level_id).await?;
    Ok(Json(ApiResponse::ok(
        "Level marked as solved successfully",
        levels,
    )))
}
