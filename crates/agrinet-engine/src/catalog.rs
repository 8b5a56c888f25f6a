//! Service catalog — marketplace listings.

use agrinet_core::error::{AgrinetError, AgrinetResult};
use agrinet_core::models::service::{CreateService, Service};
use agrinet_core::repository::{PaginatedResult, Pagination, ServiceFilter, ServiceRepository};
use tracing::info;
use uuid::Uuid;

pub struct CatalogService<S: ServiceRepository> {
    service_repo: S,
}

impl<S: ServiceRepository> CatalogService<S> {
    pub fn new(service_repo: S) -> Self {
        Self { service_repo }
    }

    pub async fn create_service(
        &self,
        provider_id: Uuid,
        input: CreateService,
    ) -> AgrinetResult<Service> {
        if input.title.trim().is_empty() {
            return Err(AgrinetError::Validation {
                message: "title must not be empty".into(),
            });
        }
        if input.description.trim().is_empty() {
            return Err(AgrinetError::Validation {
                message: "description must not be empty".into(),
            });
        }
        check_price_range(input.price_min, input.price_max)?;

        let service = self.service_repo.create(provider_id, input).await?;
        info!(service_id = %service.id, provider_id = %provider_id, "Service listing created");
        Ok(service)
    }

    pub async fn get_service(&self, id: Uuid) -> AgrinetResult<Service> {
        self.service_repo.get_by_id(id).await
    }

    /// Active listings, newest first. Anonymous-readable.
    pub async fn list_services(
        &self,
        filter: ServiceFilter,
        pagination: Pagination,
    ) -> AgrinetResult<PaginatedResult<Service>> {
        self.service_repo.list(filter, pagination).await
    }
}

fn check_price_range(min: Option<f64>, max: Option<f64>) -> AgrinetResult<()> {
    for price in [min, max].into_iter().flatten() {
        if price < 0.0 || !price.is_finite() {
            return Err(AgrinetError::InvalidRange {
                reason: "prices must be non-negative".into(),
            });
        }
    }
    if let (Some(lo), Some(hi)) = (min, max)
        && lo > hi
    {
        return Err(AgrinetError::InvalidRange {
            reason: "minimum price exceeds maximum".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_price_is_rejected() {
        let err = check_price_range(Some(-1.0), None).unwrap_err();
        assert!(matches!(err, AgrinetError::InvalidRange { .. }));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let err = check_price_range(Some(100.0), Some(50.0)).unwrap_err();
        assert!(matches!(err, AgrinetError::InvalidRange { .. }));
    }

    #[test]
    fn open_and_ordered_bounds_pass() {
        assert!(check_price_range(None, None).is_ok());
        assert!(check_price_range(Some(50.0), None).is_ok());
        assert!(check_price_range(None, Some(100.0)).is_ok());
        assert!(check_price_range(Some(50.0), Some(100.0)).is_ok());
        assert!(check_price_range(Some(75.0), Some(75.0)).is_ok());
    }
}
