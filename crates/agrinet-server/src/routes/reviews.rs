//! Peer review endpoints. Reading a user's reviews is
//! anonymous-readable; writing one requires authentication.

use agrinet_core::models::review::{CreateReview, Review};
use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::CurrentUser;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateReview>,
) -> ApiResult<Json<Review>> {
    let review = state.reviews.create_review(user.id, body).await?;
    Ok(Json(review))
}

pub async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Review>>> {
    let reviews = state.reviews.list_for_user(user_id).await?;
    Ok(Json(reviews))
}
