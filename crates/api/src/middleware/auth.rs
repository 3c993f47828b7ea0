//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use explorers_core::error::CoreError;

use crate::auth::jwt::SessionClaims;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller, resolved from the `Authorization: Bearer` header.
///
/// ```ignore
/// async fn my_handler(AuthUser(claims): AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = claims.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub SessionClaims);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match parts.headers.get(AUTHORIZATION) {
            None => None,
            Some(value) => Some(bearer_token(value.to_str().ok()).ok_or_else(|| {
                AppError::Core(CoreError::Unauthenticated(
                    "Invalid Authorization format. Expected: Bearer <token>".into(),
                ))
            })?),
        };

        let claims = state.tokens.resolve_identity(token)?;
        Ok(AuthUser(claims))
    }
}

/// Extract the token from a `Bearer <token>` header value. The scheme is
/// case-insensitive.
fn bearer_token(header: Option<&str>) -> Option<&str> {
    let (scheme, token) = header?.trim().split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
}
