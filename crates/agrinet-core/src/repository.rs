//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations must enforce
//! the storage-level invariants documented per method (compare-and-set
//! on validation status, transactional collaborator freeze check); the
//! business preconditions above them live in `agrinet-engine`.

use uuid::Uuid;

use crate::error::AgrinetResult;
use crate::models::{
    account_link::{AccountLink, CreateAccountLink},
    certificate::{Certificate, ImportCertificate},
    entity::{CreateEntity, Entity, EntityKind},
    profile::{Profile, ProfileData},
    project::{CreateProject, Project},
    review::{CreateReview, Review},
    service::{CreateService, Service, ServiceType},
    session::{CreateSession, Session},
    user::{CreateUser, UpdateUser, User, UserRole},
    validation::{
        ImpactMetric, Validation, ValidationStatus, ValidationSubject, WorkingRelationship,
    },
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

/// Filters for profile search. An empty `query` with at least one
/// filter set is a valid filter-only search.
#[derive(Debug, Clone, Default)]
pub struct ProfileFilter {
    pub query: Option<String>,
    pub role: Option<UserRole>,
    pub city: Option<String>,
    pub skill: Option<String>,
}

impl ProfileFilter {
    pub fn is_empty(&self) -> bool {
        self.query.as_deref().is_none_or(str::is_empty)
            && self.role.is_none()
            && self.city.is_none()
            && self.skill.is_none()
    }
}

/// Filters for service listing.
#[derive(Debug, Clone, Default)]
pub struct ServiceFilter {
    pub service_type: Option<ServiceType>,
    pub location: Option<String>,
    pub query: Option<String>,
}

// ---------------------------------------------------------------------------
// Identity & session
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    /// Fails with `AlreadyExists` if the email is taken.
    fn create(&self, input: CreateUser) -> impl Future<Output = AgrinetResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AgrinetResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = AgrinetResult<User>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = AgrinetResult<User>> + Send;
    /// Name/email prefix search for collaborator pickers.
    fn search(
        &self,
        query: &str,
        pagination: Pagination,
    ) -> impl Future<Output = AgrinetResult<PaginatedResult<User>>> + Send;
}

pub trait SessionRepository: Send + Sync {
    fn create(&self, input: CreateSession)
    -> impl Future<Output = AgrinetResult<Session>> + Send;
    fn get_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = AgrinetResult<Session>> + Send;
    fn invalidate(&self, id: Uuid) -> impl Future<Output = AgrinetResult<()>> + Send;
    fn invalidate_user_sessions(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = AgrinetResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Profile store
// ---------------------------------------------------------------------------

pub trait ProfileRepository: Send + Sync {
    /// Idempotent by user id: creates on first save, otherwise
    /// replaces all editable fields. Skills and experience are
    /// replaced wholesale, never merged.
    fn upsert(
        &self,
        user_id: Uuid,
        data: ProfileData,
    ) -> impl Future<Output = AgrinetResult<Profile>> + Send;
    /// Fails with `NotFound` until the first save.
    fn get_by_user(&self, user_id: Uuid) -> impl Future<Output = AgrinetResult<Profile>> + Send;
    fn search(
        &self,
        filter: ProfileFilter,
        pagination: Pagination,
    ) -> impl Future<Output = AgrinetResult<PaginatedResult<Profile>>> + Send;
    /// Marks a profile skill as verified. No-op if the skill is gone
    /// (it may have been replaced by a later upsert).
    fn mark_skill_verified(
        &self,
        user_id: Uuid,
        skill_id: Uuid,
    ) -> impl Future<Output = AgrinetResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Entity directory
// ---------------------------------------------------------------------------

pub trait EntityRepository: Send + Sync {
    fn create(&self, input: CreateEntity) -> impl Future<Output = AgrinetResult<Entity>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AgrinetResult<Entity>> + Send;
    /// Case-insensitive exact lookup, used for tag deduplication.
    fn find_by_kind_and_name(
        &self,
        kind: EntityKind,
        name: &str,
    ) -> impl Future<Output = AgrinetResult<Option<Entity>>> + Send;
    /// Case-insensitive substring search over name and descriptive
    /// fields. An empty query returns an empty result.
    fn search(
        &self,
        query: &str,
        kind: Option<EntityKind>,
        pagination: Pagination,
    ) -> impl Future<Output = AgrinetResult<Vec<Entity>>> + Send;
}

// ---------------------------------------------------------------------------
// Project ledger
// ---------------------------------------------------------------------------

pub trait ProjectRepository: Send + Sync {
    fn create(
        &self,
        creator_id: Uuid,
        input: CreateProject,
    ) -> impl Future<Output = AgrinetResult<Project>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AgrinetResult<Project>> + Send;
    fn list_by_member(
        &self,
        user_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = AgrinetResult<PaginatedResult<Project>>> + Send;
    /// Adds a collaborator. Fails with `InvalidState` if any
    /// validation already references this project; the check and the
    /// mutation run in a single storage transaction.
    fn add_collaborator(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = AgrinetResult<Project>> + Send;
    /// Removes a collaborator, under the same freeze rule.
    fn remove_collaborator(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = AgrinetResult<Project>> + Send;
}

// ---------------------------------------------------------------------------
// Validation engine storage
// ---------------------------------------------------------------------------

/// Storage input for a validation whose tags have already been
/// resolved to entity ids and whose preconditions have been checked.
#[derive(Debug, Clone)]
pub struct NewValidation {
    pub validator_id: Uuid,
    pub subject: ValidationSubject,
    pub skill_id: Uuid,
    pub skill_name: String,
    pub description: String,
    pub project_id: Option<Uuid>,
    pub tagged_entities: Vec<Uuid>,
    pub quantified_results: Option<String>,
    pub impact_metrics: Vec<ImpactMetric>,
    pub working_relationship: Option<WorkingRelationship>,
    pub collaboration_period: Option<String>,
}

pub trait ValidationRepository: Send + Sync {
    fn create(
        &self,
        input: NewValidation,
    ) -> impl Future<Output = AgrinetResult<Validation>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AgrinetResult<Validation>> + Send;
    /// Validations whose internal subject is `user_id`, newest first.
    fn list_received(
        &self,
        user_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = AgrinetResult<PaginatedResult<Validation>>> + Send;
    /// Validations authored by `user_id`, newest first.
    fn list_authored(
        &self,
        user_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = AgrinetResult<PaginatedResult<Validation>>> + Send;
    /// Atomic compare-and-set pending → `to`. Fails with
    /// `InvalidState` if the record is no longer pending; under a
    /// concurrent approve + reject exactly one call wins.
    fn transition(
        &self,
        id: Uuid,
        to: ValidationStatus,
    ) -> impl Future<Output = AgrinetResult<Validation>> + Send;
    /// Re-links pending external-subject validations matching
    /// (platform, platform_id) to the given internal user. Returns
    /// the number of re-linked records.
    fn relink_external_subject(
        &self,
        platform: &str,
        platform_id: &str,
        user_id: Uuid,
    ) -> impl Future<Output = AgrinetResult<u64>> + Send;
    /// Whether any validation references the project (drives the
    /// collaborator-set freeze).
    fn exists_for_project(
        &self,
        project_id: Uuid,
    ) -> impl Future<Output = AgrinetResult<bool>> + Send;
}

// ---------------------------------------------------------------------------
// Service catalog
// ---------------------------------------------------------------------------

pub trait ServiceRepository: Send + Sync {
    fn create(
        &self,
        provider_id: Uuid,
        input: CreateService,
    ) -> impl Future<Output = AgrinetResult<Service>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AgrinetResult<Service>> + Send;
    /// Active listings matching the filter, newest first.
    fn list(
        &self,
        filter: ServiceFilter,
        pagination: Pagination,
    ) -> impl Future<Output = AgrinetResult<PaginatedResult<Service>>> + Send;
}

// ---------------------------------------------------------------------------
// Peer reviews
// ---------------------------------------------------------------------------

pub trait ReviewRepository: Send + Sync {
    fn create(
        &self,
        reviewer_id: Uuid,
        input: CreateReview,
    ) -> impl Future<Output = AgrinetResult<Review>> + Send;
    /// Reviews received by the user, newest first.
    fn list_by_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = AgrinetResult<Vec<Review>>> + Send;
}

// ---------------------------------------------------------------------------
// External sync storage
// ---------------------------------------------------------------------------

pub trait CertificateRepository: Send + Sync {
    /// Imports a certificate, deduplicating by (user, external id).
    /// Returns `None` if an identical external id was already
    /// imported for this user.
    fn import(
        &self,
        input: ImportCertificate,
    ) -> impl Future<Output = AgrinetResult<Option<Certificate>>> + Send;
    fn list_by_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = AgrinetResult<Vec<Certificate>>> + Send;
}

pub trait AccountLinkRepository: Send + Sync {
    /// Upserts the (user, platform) link; reconnecting replaces the
    /// stored snapshot fields.
    fn connect(
        &self,
        input: CreateAccountLink,
    ) -> impl Future<Output = AgrinetResult<AccountLink>> + Send;
    fn get(
        &self,
        user_id: Uuid,
        platform: &str,
    ) -> impl Future<Output = AgrinetResult<Option<AccountLink>>> + Send;
    /// Idempotent: disconnecting an absent link is a no-op.
    fn disconnect(
        &self,
        user_id: Uuid,
        platform: &str,
    ) -> impl Future<Output = AgrinetResult<()>> + Send;
}
