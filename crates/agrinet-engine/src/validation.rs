//! Validation engine — peer attestation lifecycle.
//!
//! Preconditions are checked here, before anything is persisted; the
//! status machine itself (pending → approved | rejected, one winner
//! under concurrency) is enforced by the repository's compare-and-set.

use agrinet_core::error::{AgrinetError, AgrinetResult};
use agrinet_core::models::entity::EntityTag;
use agrinet_core::models::user::User;
use agrinet_core::models::validation::{
    CreateValidation, Validation, ValidationStatus, ValidationSubject,
};
use agrinet_core::repository::{
    EntityRepository, NewValidation, PaginatedResult, Pagination, ProfileRepository,
    ProjectRepository, UserRepository, ValidationRepository,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::notifier::InvitationNotifier;

pub struct ValidationService<V, P, E, F, U, N>
where
    V: ValidationRepository,
    P: ProjectRepository,
    E: EntityRepository,
    F: ProfileRepository,
    U: UserRepository,
    N: InvitationNotifier,
{
    validation_repo: V,
    project_repo: P,
    entity_repo: E,
    profile_repo: F,
    user_repo: U,
    notifier: N,
}

impl<V, P, E, F, U, N> ValidationService<V, P, E, F, U, N>
where
    V: ValidationRepository,
    P: ProjectRepository,
    E: EntityRepository,
    F: ProfileRepository,
    U: UserRepository,
    N: InvitationNotifier,
{
    pub fn new(
        validation_repo: V,
        project_repo: P,
        entity_repo: E,
        profile_repo: F,
        user_repo: U,
        notifier: N,
    ) -> Self {
        Self {
            validation_repo,
            project_repo,
            entity_repo,
            profile_repo,
            user_repo,
            notifier,
        }
    }

    /// Create a validation authored by `validator`.
    ///
    /// The validator comes from the resolved session, never from the
    /// payload.
    pub async fn create_validation(
        &self,
        validator: &User,
        input: CreateValidation,
    ) -> AgrinetResult<Validation> {
        // 1. Content checks.
        if input.description.trim().is_empty() {
            return Err(AgrinetError::Validation {
                message: "description must not be empty".into(),
            });
        }
        if input.skill_name.trim().is_empty() {
            return Err(AgrinetError::Validation {
                message: "skill name must not be empty".into(),
            });
        }

        // 2. A validator cannot validate themselves, and an internal
        //    subject must be a real account.
        if let Some(subject_id) = input.subject.internal_user_id() {
            if subject_id == validator.id {
                return Err(AgrinetError::InvalidSubject {
                    reason: "validator cannot be their own subject".into(),
                });
            }
            self.user_repo.get_by_id(subject_id).await?;
        }

        // 3. Project context: validator and any internal subject must
        //    both be collaborators.
        if let Some(project_id) = input.project_id {
            let project = self.project_repo.get_by_id(project_id).await?;
            if !project.is_collaborator(validator.id) {
                return Err(AgrinetError::NotACollaborator {
                    user_id: validator.id.to_string(),
                    project_id: project_id.to_string(),
                });
            }
            if let Some(subject_id) = input.subject.internal_user_id()
                && !project.is_collaborator(subject_id)
            {
                return Err(AgrinetError::NotACollaborator {
                    user_id: subject_id.to_string(),
                    project_id: project_id.to_string(),
                });
            }
        }

        // 4. Resolve entity tags to ids, creating inline entities on
        //    first use.
        let mut tagged_entities = Vec::with_capacity(input.tagged_entities.len());
        for tag in input.tagged_entities {
            tagged_entities.push(self.resolve_tag(tag).await?);
        }

        let subject = input.subject.clone();
        let validation = self
            .validation_repo
            .create(NewValidation {
                validator_id: validator.id,
                subject: input.subject,
                skill_id: input.skill_id,
                skill_name: input.skill_name,
                description: input.description,
                project_id: input.project_id,
                tagged_entities,
                quantified_results: input.quantified_results,
                impact_metrics: input.impact_metrics,
                working_relationship: input.working_relationship,
                collaboration_period: input.collaboration_period,
            })
            .await?;

        info!(
            validation_id = %validation.id,
            validator_id = %validator.id,
            "Validation created"
        );

        // 5. Best-effort invitation for external subjects. A delivery
        //    failure never rolls back the validation.
        if let ValidationSubject::External(ref external) = subject {
            if let Err(e) = self
                .notifier
                .invite(external, &validator.name, &validation.skill_name)
                .await
            {
                warn!(
                    validation_id = %validation.id,
                    platform = %external.platform,
                    error = %e,
                    "Invitation delivery failed"
                );
            }
        }

        Ok(validation)
    }

    pub async fn get_validation(&self, id: Uuid) -> AgrinetResult<Validation> {
        self.validation_repo.get_by_id(id).await
    }

    /// Approve a pending validation. Only the internal subject may
    /// act; approval also marks the named profile skill as verified.
    pub async fn approve(&self, id: Uuid, actor: Uuid) -> AgrinetResult<Validation> {
        let validation = self.authorize_transition(id, actor).await?;

        let updated = self
            .validation_repo
            .transition(validation.id, ValidationStatus::Approved)
            .await?;

        // Skill verification is a side effect of approval; the skill
        // may have been replaced by a later profile upsert, in which
        // case this is a no-op.
        if let Err(e) = self
            .profile_repo
            .mark_skill_verified(actor, updated.skill_id)
            .await
        {
            warn!(
                validation_id = %updated.id,
                skill_id = %updated.skill_id,
                error = %e,
                "Skill verification update failed"
            );
        }

        info!(validation_id = %updated.id, actor = %actor, "Validation approved");
        Ok(updated)
    }

    /// Reject a pending validation. Only the internal subject may act.
    pub async fn reject(&self, id: Uuid, actor: Uuid) -> AgrinetResult<Validation> {
        let validation = self.authorize_transition(id, actor).await?;

        let updated = self
            .validation_repo
            .transition(validation.id, ValidationStatus::Rejected)
            .await?;

        info!(validation_id = %updated.id, actor = %actor, "Validation rejected");
        Ok(updated)
    }

    pub async fn list_received(
        &self,
        user_id: Uuid,
        pagination: Pagination,
    ) -> AgrinetResult<PaginatedResult<Validation>> {
        self.validation_repo.list_received(user_id, pagination).await
    }

    pub async fn list_authored(
        &self,
        user_id: Uuid,
        pagination: Pagination,
    ) -> AgrinetResult<PaginatedResult<Validation>> {
        self.validation_repo.list_authored(user_id, pagination).await
    }

    /// Re-link pending external-subject validations matching the
    /// (platform, platform_id) snapshot to a newly registered user.
    pub async fn claim_external_subject(
        &self,
        platform: &str,
        platform_id: &str,
        user_id: Uuid,
    ) -> AgrinetResult<u64> {
        let relinked = self
            .validation_repo
            .relink_external_subject(platform, platform_id, user_id)
            .await?;

        if relinked > 0 {
            info!(
                platform,
                platform_id,
                user_id = %user_id,
                relinked,
                "External-subject validations claimed"
            );
        }

        Ok(relinked)
    }

    /// Shared guard for approve/reject: the actor must be the internal
    /// subject and the record must still be pending. The repository's
    /// compare-and-set re-checks pending atomically.
    async fn authorize_transition(&self, id: Uuid, actor: Uuid) -> AgrinetResult<Validation> {
        let validation = self.validation_repo.get_by_id(id).await?;

        match validation.subject.internal_user_id() {
            Some(subject_id) if subject_id == actor => {}
            Some(_) => {
                return Err(AgrinetError::Forbidden {
                    reason: "only the validation subject may act on it".into(),
                });
            }
            None => {
                return Err(AgrinetError::Forbidden {
                    reason: "validation subject has not been claimed yet".into(),
                });
            }
        }

        if validation.status.is_terminal() {
            return Err(AgrinetError::InvalidState {
                reason: format!(
                    "validation is already {}",
                    validation.status.as_str()
                ),
            });
        }

        Ok(validation)
    }

    async fn resolve_tag(&self, tag: EntityTag) -> AgrinetResult<Uuid> {
        match tag {
            EntityTag::Existing { entity_id } => {
                // Reject dangling references up front.
                let entity = self.entity_repo.get_by_id(entity_id).await?;
                Ok(entity.id)
            }
            EntityTag::Inline(input) => {
                let kind = input.details.kind();
                if let Some(existing) = self
                    .entity_repo
                    .find_by_kind_and_name(kind, &input.name)
                    .await?
                {
                    return Ok(existing.id);
                }
                let created = self.entity_repo.create(input).await?;
                info!(entity_id = %created.id, kind = kind.as_str(), "Entity auto-created from tag");
                Ok(created.id)
            }
        }
    }
}
