//! Search endpoints over profiles, collaborators, entities, services,
//! and external profiles.

use agrinet_core::models::entity::{Entity, EntityKind};
use agrinet_core::models::profile::Profile;
use agrinet_core::models::service::{Service, ServiceType};
use agrinet_core::models::user::{User, UserRole};
use agrinet_core::repository::{ProfileFilter, ServiceFilter};
use agrinet_sync::ExternalProfile;
use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::extract::CurrentUser;
use crate::routes::{PageQuery, PageResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EntityQuery {
    #[serde(default)]
    pub q: String,
    pub kind: Option<String>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    pub q: Option<String>,
    pub role: Option<String>,
    pub city: Option<String>,
    pub skill: Option<String>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct TextQuery {
    #[serde(default)]
    pub q: String,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

pub async fn entities(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Query(query): Query<EntityQuery>,
) -> ApiResult<Json<Vec<Entity>>> {
    let kind = query.kind.as_deref().and_then(EntityKind::parse);
    let page = PageQuery {
        offset: query.offset,
        limit: query.limit,
    };
    let found = state
        .search
        .search_entities(&query.q, kind, page.into_pagination())
        .await?;
    Ok(Json(found))
}

pub async fn profiles(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Query(query): Query<ProfileQuery>,
) -> ApiResult<Json<PageResponse<Profile>>> {
    let filter = ProfileFilter {
        query: query.q,
        role: query.role.as_deref().and_then(UserRole::parse),
        city: query.city,
        skill: query.skill,
    };
    let page = PageQuery {
        offset: query.offset,
        limit: query.limit,
    };
    let result = state
        .search
        .search_profiles(filter, page.into_pagination())
        .await?;
    Ok(Json(result.into()))
}

pub async fn collaborators(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Query(query): Query<TextQuery>,
) -> ApiResult<Json<PageResponse<User>>> {
    let page = PageQuery {
        offset: query.offset,
        limit: query.limit,
    };
    let result = state
        .search
        .search_collaborators(&query.q, page.into_pagination())
        .await?;
    Ok(Json(result.into()))
}

#[derive(Debug, Deserialize)]
pub struct ServiceSearchQuery {
    pub q: Option<String>,
    pub service_type: Option<String>,
    pub location: Option<String>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

pub async fn services(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Query(query): Query<ServiceSearchQuery>,
) -> ApiResult<Json<PageResponse<Service>>> {
    let filter = ServiceFilter {
        service_type: query.service_type.as_deref().and_then(ServiceType::parse),
        location: query.location,
        query: query.q,
    };
    let page = PageQuery {
        offset: query.offset,
        limit: query.limit,
    };
    let result = state
        .search
        .search_services(filter, page.into_pagination())
        .await?;
    Ok(Json(result.into()))
}

pub async fn external_profiles(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Query(query): Query<TextQuery>,
) -> ApiResult<Json<Vec<ExternalProfile>>> {
    let found = state.sync.search_external_profiles(&query.q).await?;
    Ok(Json(found))
}
