//! Validation endpoints.

use agrinet_core::models::validation::{CreateValidation, Validation};
use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::CurrentUser;
use crate::routes::{PageQuery, PageResponse};
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateValidation>,
) -> ApiResult<Json<Validation>> {
    let validation = state.validations.create_validation(&user, body).await?;
    Ok(Json(validation))
}

pub async fn get(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Validation>> {
    let validation = state.validations.get_validation(id).await?;
    Ok(Json(validation))
}

pub async fn received(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<PageResponse<Validation>>> {
    let result = state
        .validations
        .list_received(user.id, page.into_pagination())
        .await?;
    Ok(Json(result.into()))
}

pub async fn authored(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<PageResponse<Validation>>> {
    let result = state
        .validations
        .list_authored(user.id, page.into_pagination())
        .await?;
    Ok(Json(result.into()))
}

pub async fn approve(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Validation>> {
    let validation = state.validations.approve(id, user.id).await?;
    Ok(Json(validation))
}

pub async fn reject(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Validation>> {
    let validation = state.validations.reject(id, user.id).await?;
    Ok(Json(validation))
}
