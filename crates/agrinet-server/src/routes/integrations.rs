//! External network integration endpoints.

use agrinet_core::models::account_link::AccountLink;
use agrinet_core::models::certificate::Certificate;
use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiResult;
use crate::extract::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    pub platform_id: String,
}

pub async fn connect(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<ConnectRequest>,
) -> ApiResult<Json<AccountLink>> {
    let link = state.sync.connect(user.id, &body.platform_id).await?;

    // Claim pending validations addressed to this external identity.
    state
        .validations
        .claim_external_subject(&link.platform, &link.platform_id, user.id)
        .await?;

    Ok(Json(link))
}

pub async fn get_link(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Option<AccountLink>>> {
    let link = state.sync.get_link(user.id).await?;
    Ok(Json(link))
}

pub async fn disconnect(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<serde_json::Value>> {
    state.sync.disconnect(user.id).await?;
    Ok(Json(json!({ "detail": "disconnected" })))
}

pub async fn import_certificates(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Vec<Certificate>>> {
    let imported = state.sync.import_certificates(user.id).await?;
    Ok(Json(imported))
}

pub async fn sync_experience(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<serde_json::Value>> {
    let added = state.sync.sync_experience(user.id).await?;
    Ok(Json(json!({ "added": added })))
}
