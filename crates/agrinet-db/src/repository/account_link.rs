//! SurrealDB implementation of [`AccountLinkRepository`].

use agrinet_core::error::AgrinetResult;
use agrinet_core::models::account_link::{AccountLink, CreateAccountLink};
use agrinet_core::repository::AccountLinkRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct AccountLinkRow {
    record_id: String,
    user_id: String,
    platform: String,
    platform_id: String,
    display_name: Option<String>,
    profile_url: Option<String>,
    connected_at: DateTime<Utc>,
}

impl AccountLinkRow {
    fn try_into_link(self) -> Result<AccountLink, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Corrupt(format!("invalid user UUID: {e}")))?;
        Ok(AccountLink {
            id,
            user_id,
            platform: self.platform,
            platform_id: self.platform_id,
            display_name: self.display_name,
            profile_url: self.profile_url,
            connected_at: self.connected_at,
        })
    }
}

/// SurrealDB implementation of the AccountLink repository.
#[derive(Clone)]
pub struct SurrealAccountLinkRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAccountLinkRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(
        &self,
        user_id: &str,
        platform: &str,
    ) -> Result<Option<AccountLinkRow>, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM account_link \
                 WHERE user_id = $user_id AND platform = $platform",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("platform", platform.to_string()))
            .await?;
        let rows: Vec<AccountLinkRow> = result.take(0)?;
        Ok(rows.into_iter().next())
    }
}

impl<C: Connection> AccountLinkRepository for SurrealAccountLinkRepository<C> {
    async fn connect(&self, input: CreateAccountLink) -> AgrinetResult<AccountLink> {
        let user_id_str = input.user_id.to_string();

        // Reconnecting replaces the stored snapshot fields.
        if let Some(existing) = self.fetch(&user_id_str, &input.platform).await? {
            self.db
                .query(
                    "UPDATE type::record('account_link', $id) SET \
                     platform_id = $platform_id, \
                     display_name = $display_name, \
                     profile_url = $profile_url, \
                     connected_at = time::now()",
                )
                .bind(("id", existing.record_id.clone()))
                .bind(("platform_id", input.platform_id))
                .bind(("display_name", input.display_name))
                .bind(("profile_url", input.profile_url))
                .await
                .map_err(DbError::from)?
                .check()
                .map_err(|e| DbError::Corrupt(e.to_string()))?;

            let row = self
                .fetch(&user_id_str, &input.platform)
                .await?
                .ok_or_else(|| DbError::NotFound {
                    entity: "account_link".into(),
                    id: existing.record_id,
                })?;
            return Ok(row.try_into_link()?);
        }

        let id = Uuid::new_v4();
        let result = self
            .db
            .query(
                "CREATE type::record('account_link', $id) SET \
                 user_id = $user_id, \
                 platform = $platform, \
                 platform_id = $platform_id, \
                 display_name = $display_name, \
                 profile_url = $profile_url",
            )
            .bind(("id", id.to_string()))
            .bind(("user_id", user_id_str.clone()))
            .bind(("platform", input.platform.clone()))
            .bind(("platform_id", input.platform_id))
            .bind(("display_name", input.display_name))
            .bind(("profile_url", input.profile_url))
            .await
            .map_err(DbError::from)?;

        result
            .check()
            .map_err(|e| DbError::Corrupt(e.to_string()))?;

        let row = self
            .fetch(&user_id_str, &input.platform)
            .await?
            .ok_or_else(|| DbError::NotFound {
                entity: "account_link".into(),
                id: id.to_string(),
            })?;
        Ok(row.try_into_link()?)
    }

    async fn get(&self, user_id: Uuid, platform: &str) -> AgrinetResult<Option<AccountLink>> {
        match self.fetch(&user_id.to_string(), platform).await? {
            Some(row) => Ok(Some(row.try_into_link()?)),
            None => Ok(None),
        }
    }

    async fn disconnect(&self, user_id: Uuid, platform: &str) -> AgrinetResult<()> {
        self.db
            .query(
                "DELETE account_link \
                 WHERE user_id = $user_id AND platform = $platform",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("platform", platform.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Corrupt(e.to_string()))?;
        Ok(())
    }
}
