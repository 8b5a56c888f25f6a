//! SurrealDB implementation of [`EntityRepository`].
//!
//! Each entity stores a lowercase `search_text` blob (name plus the
//! kind-specific descriptive fields) computed at write time, so the
//! substring search is a single field scan.

use agrinet_core::error::AgrinetResult;
use agrinet_core::models::entity::{CreateEntity, Entity, EntityDetails, EntityKind};
use agrinet_core::repository::{EntityRepository, Pagination};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct EntityRow {
    record_id: String,
    name: String,
    kind: String,
    details: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl EntityRow {
    fn try_into_entity(self) -> Result<Entity, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        let details: EntityDetails = serde_json::from_value(self.details)
            .map_err(|e| DbError::Corrupt(format!("invalid entity details: {e}")))?;
        if details.kind().as_str() != self.kind {
            return Err(DbError::Corrupt(format!(
                "entity kind mismatch: column says {}, details say {}",
                self.kind,
                details.kind().as_str()
            )));
        }
        Ok(Entity {
            id,
            name: self.name,
            details,
            created_at: self.created_at,
        })
    }
}

fn search_text(name: &str, details: &EntityDetails) -> String {
    let mut text = name.to_lowercase();
    for field in details.searchable_fields() {
        text.push(' ');
        text.push_str(&field.to_lowercase());
    }
    text
}

/// SurrealDB implementation of the Entity repository.
#[derive(Clone)]
pub struct SurrealEntityRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealEntityRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> EntityRepository for SurrealEntityRepository<C> {
    async fn create(&self, input: CreateEntity) -> AgrinetResult<Entity> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let kind = input.details.kind();
        let text = search_text(&input.name, &input.details);
        let details = serde_json::to_value(&input.details)
            .map_err(|e| DbError::Corrupt(format!("serialize error: {e}")))?;

        let result = self
            .db
            .query(
                "CREATE type::record('entity', $id) SET \
                 name = $name, \
                 kind = $kind, \
                 details = $details, \
                 search_text = $search_text",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("kind", kind.as_str()))
            .bind(("details", details))
            .bind(("search_text", text))
            .await
            .map_err(DbError::from)?;

        result
            .check()
            .map_err(|e| DbError::Corrupt(e.to_string()))?;

        self.get_by_id(id).await
    }

    async fn get_by_id(&self, id: Uuid) -> AgrinetResult<Entity> {
        let id_str = id.to_string();
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM type::record('entity', $id)",
            )
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EntityRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "entity".into(),
            id: id_str,
        })?;

        Ok(row.try_into_entity()?)
    }

    async fn find_by_kind_and_name(
        &self,
        kind: EntityKind,
        name: &str,
    ) -> AgrinetResult<Option<Entity>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM entity \
                 WHERE kind = $kind \
                 AND string::lowercase(name) = $name",
            )
            .bind(("kind", kind.as_str()))
            .bind(("name", name.to_lowercase()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EntityRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_entity()?)),
            None => Ok(None),
        }
    }

    async fn search(
        &self,
        query: &str,
        kind: Option<EntityKind>,
        pagination: Pagination,
    ) -> AgrinetResult<Vec<Entity>> {
        // Empty query returns empty, not the whole catalog.
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let query_str = match kind {
            Some(_) => {
                "SELECT meta::id(id) AS record_id, * FROM entity \
                 WHERE kind = $kind \
                 AND string::contains(search_text, $needle) \
                 ORDER BY created_at ASC LIMIT $limit START $offset"
            }
            None => {
                "SELECT meta::id(id) AS record_id, * FROM entity \
                 WHERE string::contains(search_text, $needle) \
                 ORDER BY created_at ASC LIMIT $limit START $offset"
            }
        };

        let mut q = self
            .db
            .query(query_str)
            .bind(("needle", needle))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));
        if let Some(kind) = kind {
            q = q.bind(("kind", kind.as_str()));
        }

        let mut result = q.await.map_err(DbError::from)?;
        let rows: Vec<EntityRow> = result.take(0).map_err(DbError::from)?;
        rows.into_iter()
            .map(|r| r.try_into_entity().map_err(Into::into))
            .collect()
    }
}
