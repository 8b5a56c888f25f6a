//! SurrealDB implementation of [`CertificateRepository`].
//!
//! Imports are idempotent: a unique (user_id, external_id) index
//! backs the dedupe check, so re-importing the same certificate set
//! creates nothing new.

use agrinet_core::error::AgrinetResult;
use agrinet_core::models::certificate::{Certificate, ImportCertificate};
use agrinet_core::repository::CertificateRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct CertificateRow {
    record_id: String,
    user_id: String,
    external_id: String,
    name: String,
    issuing_organization: String,
    issue_date: DateTime<Utc>,
    expiry_date: Option<DateTime<Utc>>,
    verification_url: Option<String>,
    imported_at: DateTime<Utc>,
}

impl CertificateRow {
    fn try_into_certificate(self) -> Result<Certificate, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Corrupt(format!("invalid user UUID: {e}")))?;
        Ok(Certificate {
            id,
            user_id,
            external_id: self.external_id,
            name: self.name,
            issuing_organization: self.issuing_organization,
            issue_date: self.issue_date,
            expiry_date: self.expiry_date,
            verification_url: self.verification_url,
            imported_at: self.imported_at,
        })
    }
}

/// SurrealDB implementation of the Certificate repository.
#[derive(Clone)]
pub struct SurrealCertificateRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCertificateRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn find(
        &self,
        user_id: &str,
        external_id: &str,
    ) -> Result<Option<CertificateRow>, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM certificate \
                 WHERE user_id = $user_id AND external_id = $external_id",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("external_id", external_id.to_string()))
            .await?;
        let rows: Vec<CertificateRow> = result.take(0)?;
        Ok(rows.into_iter().next())
    }
}

impl<C: Connection> CertificateRepository for SurrealCertificateRepository<C> {
    async fn import(&self, input: ImportCertificate) -> AgrinetResult<Option<Certificate>> {
        let user_id_str = input.user_id.to_string();

        if self.find(&user_id_str, &input.external_id).await?.is_some() {
            return Ok(None);
        }

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('certificate', $id) SET \
                 user_id = $user_id, \
                 external_id = $external_id, \
                 name = $name, \
                 issuing_organization = $issuing_organization, \
                 issue_date = $issue_date, \
                 expiry_date = $expiry_date, \
                 verification_url = $verification_url",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", user_id_str.clone()))
            .bind(("external_id", input.external_id))
            .bind(("name", input.name))
            .bind(("issuing_organization", input.issuing_organization))
            .bind(("issue_date", input.issue_date))
            .bind(("expiry_date", input.expiry_date))
            .bind(("verification_url", input.verification_url))
            .await
            .map_err(DbError::from)?;

        result
            .check()
            .map_err(|e| DbError::Corrupt(e.to_string()))?;

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM type::record('certificate', $id)",
            )
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CertificateRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "certificate".into(),
            id: id_str,
        })?;

        Ok(Some(row.try_into_certificate()?))
    }

    async fn list_by_user(&self, user_id: Uuid) -> AgrinetResult<Vec<Certificate>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM certificate \
                 WHERE user_id = $user_id ORDER BY issue_date DESC",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CertificateRow> = result.take(0).map_err(DbError::from)?;
        rows.into_iter()
            .map(|r| r.try_into_certificate().map_err(Into::into))
            .collect()
    }
}
