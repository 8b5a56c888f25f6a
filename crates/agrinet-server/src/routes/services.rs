//! Service catalog endpoints. Listing and reads are
//! anonymous-readable; creating a listing requires authentication.

use agrinet_core::models::service::{CreateService, Service, ServiceType};
use agrinet_core::repository::ServiceFilter;
use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::CurrentUser;
use crate::routes::{PageQuery, PageResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ServiceListQuery {
    pub service_type: Option<String>,
    pub location: Option<String>,
    pub q: Option<String>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateService>,
) -> ApiResult<Json<Service>> {
    let service = state.catalog.create_service(user.id, body).await?;
    Ok(Json(service))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Service>> {
    let service = state.catalog.get_service(id).await?;
    Ok(Json(service))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ServiceListQuery>,
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
        .catalog
        .list_services(filter, page.into_pagination())
        .await?;
    Ok(Json(result.into()))
}
