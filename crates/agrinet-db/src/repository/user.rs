//! SurrealDB implementation of [`UserRepository`].
//!
//! Password hashing uses Argon2id with OWASP-recommended parameters
//! (memory: 19 MiB, iterations: 2, parallelism: 1). Salt is randomly
//! generated per hash. An optional pepper (server-side secret) can be
//! provided at construction time.

use agrinet_core::error::{AgrinetError, AgrinetResult};
use agrinet_core::models::user::{CreateUser, UpdateUser, User, UserRole};
use agrinet_core::repository::{PaginatedResult, Pagination, UserRepository};
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct UserRow {
    email: String,
    name: String,
    role: String,
    password_hash: String,
    is_active: bool,
    profile_completed: bool,
    created_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct UserRowWithId {
    record_id: String,
    email: String,
    name: String,
    role: String,
    password_hash: String,
    is_active: bool,
    profile_completed: bool,
    created_at: DateTime<Utc>,
}

fn parse_role(s: &str) -> Result<UserRole, DbError> {
    UserRole::parse(s).ok_or_else(|| DbError::Corrupt(format!("unknown user role: {s}")))
}

impl UserRow {
    fn into_user(self, id: Uuid) -> Result<User, DbError> {
        Ok(User {
            id,
            email: self.email,
            name: self.name,
            role: parse_role(&self.role)?,
            password_hash: self.password_hash,
            is_active: self.is_active,
            profile_completed: self.profile_completed,
            created_at: self.created_at,
        })
    }
}

impl UserRowWithId {
    fn try_into_user(self) -> Result<User, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        Ok(User {
            id,
            email: self.email,
            name: self.name,
            role: parse_role(&self.role)?,
            password_hash: self.password_hash,
            is_active: self.is_active,
            profile_completed: self.profile_completed,
            created_at: self.created_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// Hash a password with Argon2id using OWASP-recommended parameters.
///
/// If a pepper is provided, it is prepended to the password before
/// hashing. The salt is randomly generated for each call.
fn hash_password(password: &str, pepper: Option<&str>) -> Result<String, DbError> {
    // OWASP ASVS recommended: m=19456 (19 MiB), t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| DbError::Corrupt(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{password}");
            peppered.as_bytes()
        }
        None => password.as_bytes(),
    };

    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = argon2
        .hash_password(input, &salt)
        .map_err(|e| DbError::Corrupt(format!("password hash error: {e}")))?;

    Ok(hash.to_string())
}

/// SurrealDB implementation of the User repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
    /// Optional server-side pepper for password hashing.
    pepper: Option<String>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db, pepper: None }
    }

    pub fn with_pepper(db: Surreal<C>, pepper: String) -> Self {
        Self {
            db,
            pepper: Some(pepper),
        }
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: CreateUser) -> AgrinetResult<User> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        // Unique email index would also reject this, but checking
        // first gives a clean error instead of an index violation.
        let mut existing = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM user WHERE email = $email")
            .bind(("email", input.email.clone()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<UserRowWithId> = existing.take(0).map_err(DbError::from)?;
        if !rows.is_empty() {
            return Err(AgrinetError::AlreadyExists {
                entity: "user".into(),
            });
        }

        let password_hash = hash_password(&input.password, self.pepper.as_deref())?;

        let result = self
            .db
            .query(
                "CREATE type::record('user', $id) SET \
                 email = $email, \
                 name = $name, \
                 role = $role, \
                 password_hash = $password_hash, \
                 is_active = true, \
                 profile_completed = false",
            )
            .bind(("id", id_str.clone()))
            .bind(("email", input.email))
            .bind(("name", input.name))
            .bind(("role", input.role.as_str()))
            .bind(("password_hash", password_hash))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Corrupt(e.to_string()))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> AgrinetResult<User> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('user', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn get_by_email(&self, email: &str) -> AgrinetResult<User> {
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM user WHERE email = $email")
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: format!("email={email}"),
        })?;

        Ok(row.try_into_user()?)
    }

    async fn update(&self, id: Uuid, input: UpdateUser) -> AgrinetResult<User> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.role.is_some() {
            sets.push("role = $role");
        }
        if input.is_active.is_some() {
            sets.push("is_active = $is_active");
        }
        if input.profile_completed.is_some() {
            sets.push("profile_completed = $profile_completed");
        }

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!(
            "UPDATE type::record('user', $id) SET {}",
            sets.join(", ")
        );

        let mut q = self.db.query(query).bind(("id", id_str.clone()));
        if let Some(name) = input.name {
            q = q.bind(("name", name));
        }
        if let Some(role) = input.role {
            q = q.bind(("role", role.as_str()));
        }
        if let Some(is_active) = input.is_active {
            q = q.bind(("is_active", is_active));
        }
        if let Some(profile_completed) = input.profile_completed {
            q = q.bind(("profile_completed", profile_completed));
        }

        let mut result = q.await.map_err(DbError::from)?;
        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn search(
        &self,
        query: &str,
        pagination: Pagination,
    ) -> AgrinetResult<PaginatedResult<User>> {
        if query.trim().is_empty() {
            return Ok(PaginatedResult {
                items: Vec::new(),
                total: 0,
                offset: pagination.offset,
                limit: pagination.limit,
            });
        }

        let needle = query.trim().to_lowercase();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE is_active = true AND \
                 (string::contains(string::lowercase(name), $needle) \
                  OR string::starts_with(string::lowercase(email), $needle)) \
                 ORDER BY name ASC LIMIT $limit START $offset",
            )
            .bind(("needle", needle.clone()))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(UserRowWithId::try_into_user)
            .collect::<Result<Vec<_>, _>>()?;

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM user \
                 WHERE is_active = true AND \
                 (string::contains(string::lowercase(name), $needle) \
                  OR string::starts_with(string::lowercase(email), $needle)) \
                 GROUP ALL",
            )
            .bind(("needle", needle))
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
