//! REST route handlers and router assembly.

pub mod auth;
pub mod entities;
pub mod integrations;
pub mod profiles;
pub mod projects;
pub mod reviews;
pub mod search;
pub mod services;
pub mod validations;

use agrinet_core::repository::{PaginatedResult, Pagination};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::state::AppState;

/// Pagination query parameters, with server-side defaults.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl PageQuery {
    pub fn into_pagination(self) -> Pagination {
        let default = Pagination::default();
        Pagination {
            offset: self.offset.unwrap_or(default.offset),
            limit: self.limit.unwrap_or(default.limit).min(200),
        }
    }
}

/// Wire shape for paginated lists.
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

impl<T> From<PaginatedResult<T>> for PageResponse<T> {
    fn from(result: PaginatedResult<T>) -> Self {
        Self {
            items: result.items,
            total: result.total,
            offset: result.offset,
            limit: result.limit,
        }
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/profiles", put(profiles::upsert_own))
        .route("/api/profiles/me", get(profiles::get_own))
        .route("/api/profiles/{user_id}", get(profiles::get_by_user))
        .route("/api/validations", post(validations::create))
        .route("/api/validations/received", get(validations::received))
        .route("/api/validations/authored", get(validations::authored))
        .route("/api/validations/{id}", get(validations::get))
        .route("/api/validations/{id}/approve", post(validations::approve))
        .route("/api/validations/{id}/reject", post(validations::reject))
        .route("/api/projects", post(projects::create).get(projects::list_mine))
        .route("/api/projects/{id}", get(projects::get))
        .route(
            "/api/projects/{id}/collaborators",
            post(projects::add_collaborator),
        )
        .route(
            "/api/projects/{id}/collaborators/{user_id}",
            delete(projects::remove_collaborator),
        )
        .route("/api/services", post(services::create).get(services::list))
        .route("/api/services/{id}", get(services::get))
        .route("/api/entities", post(entities::create))
        .route("/api/entities/{id}", get(entities::get))
        .route("/api/reviews", post(reviews::create))
        .route("/api/reviews/user/{user_id}", get(reviews::list_for_user))
        .route("/api/search/entities", get(search::entities))
        .route("/api/search/profiles", get(search::profiles))
        .route("/api/search/collaborators", get(search::collaborators))
        .route("/api/search/services", get(search::services))
        .route(
            "/api/search/external-profiles",
            get(search::external_profiles),
        )
        .route(
            "/api/integrations/linkedin",
            get(integrations::get_link).delete(integrations::disconnect),
        )
        .route(
            "/api/integrations/linkedin/connect",
            post(integrations::connect),
        )
        .route(
            "/api/integrations/linkedin/import-certificates",
            post(integrations::import_certificates),
        )
        .route(
            "/api/integrations/linkedin/sync-experience",
            post(integrations::sync_experience),
        )
        .with_state(state)
}
