//! Authentication endpoints.

use agrinet_auth::{AuthOutput, LoginInput, RefreshInput};
use agrinet_core::models::user::{CreateUser, User, UserRole};
use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::CurrentUser;
use crate::state::AppState;

/// Claim of an existing external-network identity, carried with
/// registration so pending validations get re-linked.
#[derive(Debug, Deserialize)]
pub struct ExternalLinkClaim {
    pub platform: String,
    pub platform_id: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub password: String,
    pub external_link: Option<ExternalLinkClaim>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub session_id: Uuid,
    pub user: User,
}

impl From<AuthOutput> for TokenResponse {
    fn from(out: AuthOutput) -> Self {
        Self {
            access_token: out.access_token,
            refresh_token: out.refresh_token,
            token_type: "bearer",
            expires_in: out.expires_in,
            session_id: out.session_id,
            user: out.user,
        }
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let out = state
        .auth
        .register(CreateUser {
            email: body.email,
            name: body.name,
            role: body.role,
            password: body.password,
        })
        .await?;

    // Claim pending validations addressed to the external snapshot.
    // Registration already succeeded, so a re-link failure is logged
    // and not surfaced.
    if let Some(claim) = body.external_link
        && let Err(e) = state
            .validations
            .claim_external_subject(&claim.platform, &claim.platform_id, out.user.id)
            .await
    {
        warn!(
            user_id = %out.user.id,
            platform = %claim.platform,
            error = %e,
            "External subject claim failed during registration"
        );
    }

    Ok(Json(out.into()))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let out = state
        .auth
        .login(LoginInput {
            email: body.email,
            password: body.password,
            ip_address: None,
            user_agent: None,
        })
        .await?;
    Ok(Json(out.into()))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let out = state
        .auth
        .refresh(RefreshInput {
            raw_refresh_token: body.refresh_token,
            ip_address: None,
            user_agent: None,
        })
        .await?;
    Ok(Json(out.into()))
}

pub async fn logout(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(body): Json<LogoutRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    state.auth.logout(body.session_id).await?;
    Ok(Json(serde_json::json!({ "detail": "logged out" })))
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}
