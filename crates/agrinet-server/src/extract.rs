//! Request-level authentication extractor.

use agrinet_core::error::AgrinetError;
use agrinet_core::models::user::User;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated user, resolved from the bearer token. Handlers
/// that take this extractor reject unauthenticated requests with 401.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ApiError(AgrinetError::ExpiredOrInvalidToken {
                    reason: "missing Authorization header".into(),
                })
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError(AgrinetError::ExpiredOrInvalidToken {
                reason: "expected a bearer token".into(),
            })
        })?;

        let user = state.auth.resolve_session(token).await?;
        Ok(CurrentUser(user))
    }
}
