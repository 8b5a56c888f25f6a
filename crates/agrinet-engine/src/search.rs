//! Search facade — read-side live queries over the primary stores.
//!
//! There is no separate index: each search delegates to the owning
//! repository. Empty-query rules intentionally differ per target:
//! entity search returns nothing on an empty query, while profile
//! search accepts filter-only queries.

use agrinet_core::error::AgrinetResult;
use agrinet_core::models::entity::{Entity, EntityKind};
use agrinet_core::models::profile::Profile;
use agrinet_core::models::service::Service;
use agrinet_core::models::user::User;
use agrinet_core::repository::{
    EntityRepository, PaginatedResult, Pagination, ProfileFilter, ProfileRepository,
    ServiceFilter, ServiceRepository, UserRepository,
};

pub struct SearchService<U, P, E, S>
where
    U: UserRepository,
    P: ProfileRepository,
    E: EntityRepository,
    S: ServiceRepository,
{
    user_repo: U,
    profile_repo: P,
    entity_repo: E,
    service_repo: S,
}

impl<U, P, E, S> SearchService<U, P, E, S>
where
    U: UserRepository,
    P: ProfileRepository,
    E: EntityRepository,
    S: ServiceRepository,
{
    pub fn new(user_repo: U, profile_repo: P, entity_repo: E, service_repo: S) -> Self {
        Self {
            user_repo,
            profile_repo,
            entity_repo,
            service_repo,
        }
    }

    /// Profile search. An empty query with at least one filter is a
    /// valid filter-only search; no query and no filters returns
    /// nothing.
    pub async fn search_profiles(
        &self,
        filter: ProfileFilter,
        pagination: Pagination,
    ) -> AgrinetResult<PaginatedResult<Profile>> {
        if filter.is_empty() {
            return Ok(PaginatedResult {
                items: Vec::new(),
                total: 0,
                offset: pagination.offset,
                limit: pagination.limit,
            });
        }
        self.profile_repo.search(filter, pagination).await
    }

    /// Users by name/email prefix, for project and validation pickers.
    pub async fn search_collaborators(
        &self,
        query: &str,
        pagination: Pagination,
    ) -> AgrinetResult<PaginatedResult<User>> {
        self.user_repo.search(query, pagination).await
    }

    /// Entity directory search; empty query returns empty.
    pub async fn search_entities(
        &self,
        query: &str,
        kind: Option<EntityKind>,
        pagination: Pagination,
    ) -> AgrinetResult<Vec<Entity>> {
        self.entity_repo.search(query, kind, pagination).await
    }

    /// Active service listings matching the filter.
    pub async fn search_services(
        &self,
        filter: ServiceFilter,
        pagination: Pagination,
    ) -> AgrinetResult<PaginatedResult<Service>> {
        self.service_repo.list(filter, pagination).await
    }
}
