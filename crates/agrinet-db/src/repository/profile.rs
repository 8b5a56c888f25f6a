//! SurrealDB implementation of [`ProfileRepository`].
//!
//! Skills and experience are stored as flexible object arrays and
//! replaced wholesale on every upsert — the client always sends the
//! full current collection, so there is no per-item merge logic and
//! profile writes are last-write-wins.

use agrinet_core::error::AgrinetResult;
use agrinet_core::models::certificate::Certificate;
use agrinet_core::models::profile::{Address, Experience, Profile, ProfileData, Skill};
use agrinet_core::models::user::UserRole;
use agrinet_core::repository::{PaginatedResult, Pagination, ProfileFilter, ProfileRepository};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ProfileRow {
    record_id: String,
    user_id: String,
    profile_type: String,
    title: String,
    bio: Option<String>,
    phone: Option<String>,
    website: Option<String>,
    address: Option<serde_json::Value>,
    skills: serde_json::Value,
    experience: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProfileRow {
    fn try_into_profile(self, certifications: Vec<Certificate>) -> Result<Profile, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Corrupt(format!("invalid user UUID: {e}")))?;
        let profile_type = agrinet_core::models::profile::ProfileType::parse(&self.profile_type)
            .ok_or_else(|| DbError::Corrupt(format!("unknown profile type: {}", self.profile_type)))?;
        let address: Option<Address> = match self.address {
            Some(v) => Some(
                serde_json::from_value(v)
                    .map_err(|e| DbError::Corrupt(format!("invalid address: {e}")))?,
            ),
            None => None,
        };
        let skills: Vec<Skill> = serde_json::from_value(self.skills)
            .map_err(|e| DbError::Corrupt(format!("invalid skills: {e}")))?;
        let experience: Vec<Experience> = serde_json::from_value(self.experience)
            .map_err(|e| DbError::Corrupt(format!("invalid experience: {e}")))?;

        Ok(Profile {
            id,
            user_id,
            profile_type,
            title: self.title,
            bio: self.bio,
            phone: self.phone,
            website: self.website,
            address,
            skills,
            experience,
            certifications,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

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

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, DbError> {
    serde_json::to_value(value).map_err(|e| DbError::Corrupt(format!("serialize error: {e}")))
}

/// SurrealDB implementation of the Profile repository.
#[derive(Clone)]
pub struct SurrealProfileRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealProfileRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn certificates_for(&self, user_id: &str) -> Result<Vec<Certificate>, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM certificate \
                 WHERE user_id = $user_id ORDER BY issue_date DESC",
            )
            .bind(("user_id", user_id.to_string()))
            .await?;
        let rows: Vec<CertificateRow> = result.take(0)?;
        rows.into_iter()
            .map(CertificateRow::try_into_certificate)
            .collect()
    }

    async fn fetch_by_user(&self, user_id: &str) -> Result<Option<ProfileRow>, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM profile \
                 WHERE user_id = $user_id",
            )
            .bind(("user_id", user_id.to_string()))
            .await?;
        let rows: Vec<ProfileRow> = result.take(0)?;
        Ok(rows.into_iter().next())
    }
}

impl<C: Connection> ProfileRepository for SurrealProfileRepository<C> {
    async fn upsert(&self, user_id: Uuid, data: ProfileData) -> AgrinetResult<Profile> {
        let user_id_str = user_id.to_string();

        let address = match &data.address {
            Some(a) => Some(to_json(a)?),
            None => None,
        };
        let skills = to_json(&data.skills)?;
        let experience = to_json(&data.experience)?;

        let existing = self.fetch_by_user(&user_id_str).await?;

        let record_id = match &existing {
            Some(row) => row.record_id.clone(),
            None => Uuid::new_v4().to_string(),
        };

        // CREATE and UPDATE share the same SET list; skills and
        // experience are always replaced, never merged.
        let verb = if existing.is_some() {
            "UPDATE type::record('profile', $id) SET"
        } else {
            "CREATE type::record('profile', $id) SET user_id = $user_id,"
        };
        let query = format!(
            "{verb} \
             profile_type = $profile_type, \
             title = $title, \
             bio = $bio, \
             phone = $phone, \
             website = $website, \
             address = $address, \
             skills = $skills, \
             experience = $experience, \
             updated_at = time::now()"
        );

        self.db
            .query(query)
            .bind(("id", record_id.clone()))
            .bind(("user_id", user_id_str.clone()))
            .bind(("profile_type", data.profile_type.as_str()))
            .bind(("title", data.title))
            .bind(("bio", data.bio))
            .bind(("phone", data.phone))
            .bind(("website", data.website))
            .bind(("address", address))
            .bind(("skills", skills))
            .bind(("experience", experience))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Corrupt(e.to_string()))?;

        self.get_by_user(user_id).await
    }

    async fn get_by_user(&self, user_id: Uuid) -> AgrinetResult<Profile> {
        let user_id_str = user_id.to_string();
        let row = self
            .fetch_by_user(&user_id_str)
            .await?
            .ok_or_else(|| DbError::NotFound {
                entity: "profile".into(),
                id: format!("user={user_id_str}"),
            })?;
        let certs = self.certificates_for(&user_id_str).await?;
        Ok(row.try_into_profile(certs)?)
    }

    async fn search(
        &self,
        filter: ProfileFilter,
        pagination: Pagination,
    ) -> AgrinetResult<PaginatedResult<Profile>> {
        // Empty query with no filters would be an unbounded scan.
        if filter.is_empty() {
            return Ok(PaginatedResult {
                items: Vec::new(),
                total: 0,
                offset: pagination.offset,
                limit: pagination.limit,
            });
        }

        let mut conditions: Vec<&str> = Vec::new();
        if filter.query.as_deref().is_some_and(|q| !q.is_empty()) {
            conditions.push(
                "(string::contains(string::lowercase(title), $needle) \
                 OR string::contains(string::lowercase(bio ?? ''), $needle))",
            );
        }
        if filter.role.is_some() {
            conditions.push(
                "user_id IN (SELECT VALUE meta::id(id) FROM user WHERE role = $role)",
            );
        }
        if filter.city.is_some() {
            conditions.push("string::lowercase(address.city ?? '') = $city");
        }
        if filter.skill.is_some() {
            conditions.push(
                "array::any(skills, |$s| \
                 string::contains(string::lowercase($s.name), $skill))",
            );
        }
        let where_clause = conditions.join(" AND ");

        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM profile \
             WHERE {where_clause} \
             ORDER BY updated_at DESC LIMIT $limit START $offset"
        );
        let count_query =
            format!("SELECT count() AS total FROM profile WHERE {where_clause} GROUP ALL");

        let needle = filter
            .query
            .as_deref()
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);
        let role = filter.role.map(|r| UserRole::as_str(&r));
        let city = filter.city.as_deref().map(str::to_lowercase);
        let skill = filter.skill.as_deref().map(str::to_lowercase);

        let mut q = self
            .db
            .query(query)
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));
        if let Some(needle) = needle.clone() {
            q = q.bind(("needle", needle));
        }
        if let Some(role) = role {
            q = q.bind(("role", role));
        }
        if let Some(city) = city.clone() {
            q = q.bind(("city", city));
        }
        if let Some(skill) = skill.clone() {
            q = q.bind(("skill", skill));
        }

        let mut result = q.await.map_err(DbError::from)?;
        let rows: Vec<ProfileRow> = result.take(0).map_err(DbError::from)?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let certs = self.certificates_for(&row.user_id).await?;
            items.push(row.try_into_profile(certs)?);
        }

        let mut cq = self.db.query(count_query);
        if let Some(needle) = needle {
            cq = cq.bind(("needle", needle));
        }
        if let Some(role) = role {
            cq = cq.bind(("role", role));
        }
        if let Some(city) = city {
            cq = cq.bind(("city", city));
        }
        if let Some(skill) = skill {
            cq = cq.bind(("skill", skill));
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

    async fn mark_skill_verified(&self, user_id: Uuid, skill_id: Uuid) -> AgrinetResult<()> {
        // Read-modify-write is acceptable here: profile writes are
        // last-write-wins by contract, with no per-skill concurrency
        // control.
        let user_id_str = user_id.to_string();
        let Some(row) = self.fetch_by_user(&user_id_str).await? else {
            return Ok(());
        };

        let mut skills: Vec<Skill> = serde_json::from_value(row.skills)
            .map_err(|e| DbError::Corrupt(format!("invalid skills: {e}")))?;
        let mut touched = false;
        for skill in &mut skills {
            if skill.id == skill_id && !skill.verified {
                skill.verified = true;
                touched = true;
            }
        }
        if !touched {
            return Ok(());
        }

        let skills_json = to_json(&skills)?;
        self.db
            .query(
                "UPDATE type::record('profile', $id) SET \
                 skills = $skills, updated_at = time::now()",
            )
            .bind(("id", row.record_id))
            .bind(("skills", skills_json))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Corrupt(e.to_string()))?;

        Ok(())
    }
}
