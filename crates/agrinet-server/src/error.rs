//! Error-to-HTTP mapping for the REST boundary.

use agrinet_core::error::AgrinetError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

/// Wrapper turning domain errors into HTTP responses with a
/// `{"detail": ...}` body.
#[derive(Debug)]
pub struct ApiError(pub AgrinetError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<AgrinetError> for ApiError {
    fn from(err: AgrinetError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AgrinetError::InvalidCredentials | AgrinetError::ExpiredOrInvalidToken { .. } => {
                StatusCode::UNAUTHORIZED
            }
            AgrinetError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AgrinetError::NotFound { .. } => StatusCode::NOT_FOUND,
            AgrinetError::InvalidState { .. } | AgrinetError::AlreadyExists { .. } => {
                StatusCode::CONFLICT
            }
            AgrinetError::InvalidSubject { .. }
            | AgrinetError::InvalidDateRange { .. }
            | AgrinetError::InvalidRange { .. }
            | AgrinetError::NotACollaborator { .. }
            | AgrinetError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AgrinetError::ExternalServiceUnavailable { .. } => StatusCode::BAD_GATEWAY,
            AgrinetError::Database(_) | AgrinetError::Crypto(_) | AgrinetError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Internal details stay in the logs, not in the response.
        let detail = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self.0, "Request failed");
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
