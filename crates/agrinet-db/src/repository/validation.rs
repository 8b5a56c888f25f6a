//! SurrealDB implementation of [`ValidationRepository`].
//!
//! Validations are append-only: rows are created once and only their
//! `status` (and, on claim, their subject linkage) ever changes. The
//! pending → approved/rejected transition is a compare-and-set built
//! into the UPDATE statement, so two racing transitions produce
//! exactly one winner.

use agrinet_core::error::{AgrinetError, AgrinetResult};
use agrinet_core::models::validation::{
    ExternalProfileRef, ImpactMetric, Validation, ValidationStatus, ValidationSubject,
    WorkingRelationship,
};
use agrinet_core::repository::{
    NewValidation, PaginatedResult, Pagination, ValidationRepository,
};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ValidationRow {
    record_id: String,
    validator_id: String,
    subject_kind: String,
    subject_user_id: Option<String>,
    subject_platform: Option<String>,
    subject_platform_id: Option<String>,
    subject_name: Option<String>,
    subject_title: Option<String>,
    subject_company: Option<String>,
    skill_id: String,
    skill_name: String,
    description: String,
    project_id: Option<String>,
    tagged_entities: Vec<String>,
    quantified_results: Option<String>,
    impact_metrics: Vec<String>,
    working_relationship: Option<String>,
    collaboration_period: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ValidationRow {
    fn try_into_validation(self) -> Result<Validation, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        let validator_id = Uuid::parse_str(&self.validator_id)
            .map_err(|e| DbError::Corrupt(format!("invalid validator UUID: {e}")))?;

        let subject = match self.subject_kind.as_str() {
            "internal" => {
                let raw = self.subject_user_id.as_deref().ok_or_else(|| {
                    DbError::Corrupt("internal subject without user id".into())
                })?;
                ValidationSubject::Internal {
                    user_id: Uuid::parse_str(raw)
                        .map_err(|e| DbError::Corrupt(format!("invalid subject UUID: {e}")))?,
                }
            }
            "external" => ValidationSubject::External(ExternalProfileRef {
                platform: self
                    .subject_platform
                    .ok_or_else(|| DbError::Corrupt("external subject without platform".into()))?,
                platform_id: self.subject_platform_id.ok_or_else(|| {
                    DbError::Corrupt("external subject without platform id".into())
                })?,
                name: self
                    .subject_name
                    .ok_or_else(|| DbError::Corrupt("external subject without name".into()))?,
                title: self.subject_title,
                company: self.subject_company,
            }),
            other => {
                return Err(DbError::Corrupt(format!("unknown subject kind: {other}")));
            }
        };

        let skill_id = Uuid::parse_str(&self.skill_id)
            .map_err(|e| DbError::Corrupt(format!("invalid skill UUID: {e}")))?;
        let project_id = self
            .project_id
            .as_deref()
            .map(Uuid::parse_str)
            .transpose()
            .map_err(|e| DbError::Corrupt(format!("invalid project UUID: {e}")))?;
        let tagged_entities = self
            .tagged_entities
            .iter()
            .map(|e| {
                Uuid::parse_str(e)
                    .map_err(|err| DbError::Corrupt(format!("invalid entity UUID: {err}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let impact_metrics = self
            .impact_metrics
            .iter()
            .map(|m| {
                ImpactMetric::parse(m)
                    .ok_or_else(|| DbError::Corrupt(format!("unknown impact metric: {m}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let working_relationship = self
            .working_relationship
            .as_deref()
            .map(|w| {
                WorkingRelationship::parse(w)
                    .ok_or_else(|| DbError::Corrupt(format!("unknown relationship: {w}")))
            })
            .transpose()?;
        let status = ValidationStatus::parse(&self.status)
            .ok_or_else(|| DbError::Corrupt(format!("unknown status: {}", self.status)))?;

        Ok(Validation {
            id,
            validator_id,
            subject,
            skill_id,
            skill_name: self.skill_name,
            description: self.description,
            project_id,
            tagged_entities,
            quantified_results: self.quantified_results,
            impact_metrics,
            working_relationship,
            collaboration_period: self.collaboration_period,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Validation repository.
#[derive(Clone)]
pub struct SurrealValidationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealValidationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn list_where(
        &self,
        condition: &str,
        user_id: Uuid,
        pagination: Pagination,
    ) -> AgrinetResult<PaginatedResult<Validation>> {
        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM validation \
             WHERE {condition} \
             ORDER BY created_at DESC LIMIT $limit START $offset"
        );
        let count_query =
            format!("SELECT count() AS total FROM validation WHERE {condition} GROUP ALL");

        let mut result = self
            .db
            .query(query)
            .bind(("user_id", user_id.to_string()))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<ValidationRow> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(ValidationRow::try_into_validation)
            .collect::<Result<Vec<_>, _>>()?;

        let mut count_result = self
            .db
            .query(count_query)
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;
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

impl<C: Connection> ValidationRepository for SurrealValidationRepository<C> {
    async fn create(&self, input: NewValidation) -> AgrinetResult<Validation> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let (subject_kind, subject_user_id, platform, platform_id, name, title, company) =
            match &input.subject {
                ValidationSubject::Internal { user_id } => (
                    "internal",
                    Some(user_id.to_string()),
                    None,
                    None,
                    None,
                    None,
                    None,
                ),
                ValidationSubject::External(ext) => (
                    "external",
                    None,
                    Some(ext.platform.clone()),
                    Some(ext.platform_id.clone()),
                    Some(ext.name.clone()),
                    ext.title.clone(),
                    ext.company.clone(),
                ),
            };

        let tagged: Vec<String> = input.tagged_entities.iter().map(Uuid::to_string).collect();
        let metrics: Vec<String> = input
            .impact_metrics
            .iter()
            .map(|m| m.as_str().to_string())
            .collect();

        let result = self
            .db
            .query(
                "CREATE type::record('validation', $id) SET \
                 validator_id = $validator_id, \
                 subject_kind = $subject_kind, \
                 subject_user_id = $subject_user_id, \
                 subject_platform = $subject_platform, \
                 subject_platform_id = $subject_platform_id, \
                 subject_name = $subject_name, \
                 subject_title = $subject_title, \
                 subject_company = $subject_company, \
                 skill_id = $skill_id, \
                 skill_name = $skill_name, \
                 description = $description, \
                 project_id = $project_id, \
                 tagged_entities = $tagged_entities, \
                 quantified_results = $quantified_results, \
                 impact_metrics = $impact_metrics, \
                 working_relationship = $working_relationship, \
                 collaboration_period = $collaboration_period, \
                 status = 'pending'",
            )
            .bind(("id", id_str))
            .bind(("validator_id", input.validator_id.to_string()))
            .bind(("subject_kind", subject_kind))
            .bind(("subject_user_id", subject_user_id))
            .bind(("subject_platform", platform))
            .bind(("subject_platform_id", platform_id))
            .bind(("subject_name", name))
            .bind(("subject_title", title))
            .bind(("subject_company", company))
            .bind(("skill_id", input.skill_id.to_string()))
            .bind(("skill_name", input.skill_name))
            .bind(("description", input.description))
            .bind(("project_id", input.project_id.map(|p| p.to_string())))
            .bind(("tagged_entities", tagged))
            .bind(("quantified_results", input.quantified_results))
            .bind(("impact_metrics", metrics))
            .bind((
                "working_relationship",
                input.working_relationship.map(|w| w.as_str().to_string()),
            ))
            .bind(("collaboration_period", input.collaboration_period))
            .await
            .map_err(DbError::from)?;

        result
            .check()
            .map_err(|e| DbError::Corrupt(e.to_string()))?;

        self.get_by_id(id).await
    }

    async fn get_by_id(&self, id: Uuid) -> AgrinetResult<Validation> {
        let id_str = id.to_string();
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM type::record('validation', $id)",
            )
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ValidationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "validation".into(),
            id: id_str,
        })?;

        Ok(row.try_into_validation()?)
    }

    async fn list_received(
        &self,
        user_id: Uuid,
        pagination: Pagination,
    ) -> AgrinetResult<PaginatedResult<Validation>> {
        self.list_where(
            "subject_kind = 'internal' AND subject_user_id = $user_id",
            user_id,
            pagination,
        )
        .await
    }

    async fn list_authored(
        &self,
        user_id: Uuid,
        pagination: Pagination,
    ) -> AgrinetResult<PaginatedResult<Validation>> {
        self.list_where("validator_id = $user_id", user_id, pagination)
            .await
    }

    async fn transition(&self, id: Uuid, to: ValidationStatus) -> AgrinetResult<Validation> {
        if !to.is_terminal() {
            return Err(AgrinetError::InvalidState {
                reason: "validations can only transition to approved or rejected".into(),
            });
        }

        let id_str = id.to_string();

        // Compare-and-set: the WHERE clause makes the update a no-op
        // unless the record is still pending.
        let mut result = self
            .db
            .query(
                "UPDATE type::record('validation', $id) SET \
                 status = $status, updated_at = time::now() \
                 WHERE status = 'pending' \
                 RETURN meta::id(id) AS record_id, *",
            )
            .bind(("id", id_str.clone()))
            .bind(("status", to.as_str()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ValidationRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(row.try_into_validation()?),
            None => {
                // Lost the race or the transition already happened;
                // distinguish from a missing record.
                let current = self.get_by_id(id).await?;
                Err(AgrinetError::InvalidState {
                    reason: format!(
                        "validation is {} and cannot transition",
                        current.status.as_str()
                    ),
                })
            }
        }
    }

    async fn relink_external_subject(
        &self,
        platform: &str,
        platform_id: &str,
        user_id: Uuid,
    ) -> AgrinetResult<u64> {
        let mut result = self
            .db
            .query(
                "UPDATE validation SET \
                 subject_kind = 'internal', \
                 subject_user_id = $user_id, \
                 updated_at = time::now() \
                 WHERE status = 'pending' \
                 AND subject_kind = 'external' \
                 AND subject_platform = $platform \
                 AND subject_platform_id = $platform_id \
                 RETURN meta::id(id) AS record_id, *",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("platform", platform.to_string()))
            .bind(("platform_id", platform_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ValidationRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.len() as u64)
    }

    async fn exists_for_project(&self, project_id: Uuid) -> AgrinetResult<bool> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM validation \
                 WHERE project_id = $project_id GROUP ALL",
            )
            .bind(("project_id", project_id.to_string()))
            .await
            .map_err(DbError::from)?;
        let counts: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(counts.first().map(|c| c.total).unwrap_or(0) > 0)
    }
}
