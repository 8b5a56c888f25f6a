//! Profile endpoints. Writes are owner-only: the target user id is
//! always the resolved session user.

use agrinet_core::models::profile::{Profile, ProfileData};
use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::CurrentUser;
use crate::state::AppState;

pub async fn upsert_own(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<ProfileData>,
) -> ApiResult<Json<Profile>> {
    let profile = state.profiles.upsert_profile(user.id, body).await?;
    Ok(Json(profile))
}

pub async fn get_own(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Profile>> {
    let profile = state.profiles.get_profile(user.id).await?;
    Ok(Json(profile))
}

pub async fn get_by_user(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<Profile>> {
    let profile = state.profiles.get_profile(user_id).await?;
    Ok(Json(profile))
}
