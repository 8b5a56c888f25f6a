//! Entity directory endpoints.

use agrinet_core::models::entity::{CreateEntity, Entity};
use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::CurrentUser;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(body): Json<CreateEntity>,
) -> ApiResult<Json<Entity>> {
    let entity = state.directory.create_entity(body).await?;
    Ok(Json(entity))
}

pub async fn get(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Entity>> {
    let entity = state.directory.get_entity(id).await?;
    Ok(Json(entity))
}
