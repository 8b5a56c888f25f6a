//! Entity directory service.
//!
//! Entities are shared directory rows, not user-owned records, so
//! creating one that already exists (same kind, same name up to case)
//! is rejected rather than duplicated.

use agrinet_core::error::{AgrinetError, AgrinetResult};
use agrinet_core::models::entity::{CreateEntity, Entity};
use agrinet_core::repository::EntityRepository;
use tracing::info;
use uuid::Uuid;

pub struct DirectoryService<E: EntityRepository> {
    entity_repo: E,
}

impl<E: EntityRepository> DirectoryService<E> {
    pub fn new(entity_repo: E) -> Self {
        Self { entity_repo }
    }

    pub async fn create_entity(&self, input: CreateEntity) -> AgrinetResult<Entity> {
        if input.name.trim().is_empty() {
            return Err(AgrinetError::Validation {
                message: "entity name must not be empty".into(),
            });
        }

        let kind = input.details.kind();
        if self
            .entity_repo
            .find_by_kind_and_name(kind, &input.name)
            .await?
            .is_some()
        {
            return Err(AgrinetError::AlreadyExists {
                entity: "entity".into(),
            });
        }

        let created = self.entity_repo.create(input).await?;
        info!(entity_id = %created.id, kind = kind.as_str(), "Entity created");
        Ok(created)
    }

    pub async fn get_entity(&self, id: Uuid) -> AgrinetResult<Entity> {
        self.entity_repo.get_by_id(id).await
    }
}
