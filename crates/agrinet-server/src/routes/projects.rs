//! Project endpoints.

use agrinet_core::models::project::{CreateProject, Project};
use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::CurrentUser;
use crate::routes::{PageQuery, PageResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddCollaboratorRequest {
    pub user_id: Uuid,
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateProject>,
) -> ApiResult<Json<Project>> {
    let project = state.projects.create_project(user.id, body).await?;
    Ok(Json(project))
}

pub async fn get(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    let project = state.projects.get_project(id).await?;
    Ok(Json(project))
}

pub async fn list_mine(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<PageResponse<Project>>> {
    let result = state
        .projects
        .list_for_user(user.id, page.into_pagination())
        .await?;
    Ok(Json(result.into()))
}

pub async fn add_collaborator(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<AddCollaboratorRequest>,
) -> ApiResult<Json<Project>> {
    let project = state
        .projects
        .add_collaborator(id, user.id, body.user_id)
        .await?;
    Ok(Json(project))
}

pub async fn remove_collaborator(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Project>> {
    let project = state
        .projects
        .remove_collaborator(id, user.id, user_id)
        .await?;
    Ok(Json(project))
}
