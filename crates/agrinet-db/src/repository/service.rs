//! SurrealDB implementation of [`ServiceRepository`].

use agrinet_core::error::AgrinetResult;
use agrinet_core::models::service::{
    CreateService, ExperienceLevel, Service, ServiceType,
};
use agrinet_core::repository::{
    PaginatedResult, Pagination, ServiceFilter, ServiceRepository,
};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ServiceRow {
    record_id: String,
    provider_id: String,
    title: String,
    description: String,
    service_type: String,
    price_min: Option<f64>,
    price_max: Option<f64>,
    currency: String,
    location: Option<String>,
    experience_level: String,
    skills_required: Vec<String>,
    availability: Option<String>,
    active: bool,
    created_at: DateTime<Utc>,
}

impl ServiceRow {
    fn try_into_service(self) -> Result<Service, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        let provider_id = Uuid::parse_str(&self.provider_id)
            .map_err(|e| DbError::Corrupt(format!("invalid provider UUID: {e}")))?;
        let service_type = ServiceType::parse(&self.service_type)
            .ok_or_else(|| DbError::Corrupt(format!("unknown service type: {}", self.service_type)))?;
        let experience_level = ExperienceLevel::parse(&self.experience_level).ok_or_else(|| {
            DbError::Corrupt(format!(
                "unknown experience level: {}",
                self.experience_level
            ))
        })?;
        Ok(Service {
            id,
            provider_id,
            title: self.title,
            description: self.description,
            service_type,
            price_min: self.price_min,
            price_max: self.price_max,
            currency: self.currency,
            location: self.location,
            experience_level,
            skills_required: self.skills_required,
            availability: self.availability,
            active: self.active,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Service repository.
#[derive(Clone)]
pub struct SurrealServiceRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealServiceRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ServiceRepository for SurrealServiceRepository<C> {
    async fn create(&self, provider_id: Uuid, input: CreateService) -> AgrinetResult<Service> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('service', $id) SET \
                 provider_id = $provider_id, \
                 title = $title, \
                 description = $description, \
                 service_type = $service_type, \
                 price_min = $price_min, \
                 price_max = $price_max, \
                 currency = $currency, \
                 location = $location, \
                 experience_level = $experience_level, \
                 skills_required = $skills_required, \
                 availability = $availability, \
                 active = true",
            )
            .bind(("id", id_str))
            .bind(("provider_id", provider_id.to_string()))
            .bind(("title", input.title))
            .bind(("description", input.description))
            .bind(("service_type", input.service_type.as_str()))
            .bind(("price_min", input.price_min))
            .bind(("price_max", input.price_max))
            .bind(("currency", input.currency))
            .bind(("location", input.location))
            .bind(("experience_level", input.experience_level.as_str()))
            .bind(("skills_required", input.skills_required))
            .bind(("availability", input.availability))
            .await
            .map_err(DbError::from)?;

        result
            .check()
            .map_err(|e| DbError::Corrupt(e.to_string()))?;

        self.get_by_id(id).await
    }

    async fn get_by_id(&self, id: Uuid) -> AgrinetResult<Service> {
        let id_str = id.to_string();
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM type::record('service', $id)",
            )
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ServiceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "service".into(),
            id: id_str,
        })?;

        Ok(row.try_into_service()?)
    }

    async fn list(
        &self,
        filter: ServiceFilter,
        pagination: Pagination,
    ) -> AgrinetResult<PaginatedResult<Service>> {
        let mut conditions: Vec<&str> = vec!["active = true"];
        if filter.service_type.is_some() {
            conditions.push("service_type = $service_type");
        }
        if filter.location.is_some() {
            conditions.push("string::contains(string::lowercase(location ?? ''), $location)");
        }
        if filter.query.as_deref().is_some_and(|q| !q.is_empty()) {
            conditions.push(
                "(string::contains(string::lowercase(title), $needle) \
                 OR string::contains(string::lowercase(description), $needle))",
            );
        }
        let where_clause = conditions.join(" AND ");

        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM service \
             WHERE {where_clause} \
             ORDER BY created_at DESC LIMIT $limit START $offset"
        );
        let count_query =
            format!("SELECT count() AS total FROM service WHERE {where_clause} GROUP ALL");

        let service_type = filter.service_type.map(|t| t.as_str());
        let location = filter.location.as_deref().map(str::to_lowercase);
        let needle = filter
            .query
            .as_deref()
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        let mut q = self
            .db
            .query(query)
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));
        if let Some(service_type) = service_type {
            q = q.bind(("service_type", service_type));
        }
        if let Some(location) = location.clone() {
            q = q.bind(("location", location));
        }
        if let Some(needle) = needle.clone() {
            q = q.bind(("needle", needle));
        }
        let mut result = q.await.map_err(DbError::from)?;
        let rows: Vec<ServiceRow> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(ServiceRow::try_into_service)
            .collect::<Result<Vec<_>, _>>()?;

        let mut cq = self.db.query(count_query);
        if let Some(service_type) = service_type {
            cq = cq.bind(("service_type", service_type));
        }
        if let Some(location) = location {
            cq = cq.bind(("location", location));
        }
        if let Some(needle) = needle {
            cq = cq.bind(("needle", needle));
        }
        let mut count_result = cq.await.map_err(DbError::from)?;
        let counts: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = counts.first().map(|c| c.total).unwrap_or(0);

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
