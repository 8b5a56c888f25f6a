//! Project ledger — collaboration context for validations.

use agrinet_core::error::{AgrinetError, AgrinetResult};
use agrinet_core::models::project::{CreateProject, Project};
use agrinet_core::repository::{
    PaginatedResult, Pagination, ProjectRepository, ValidationRepository,
};
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

pub struct ProjectService<P: ProjectRepository, V: ValidationRepository> {
    project_repo: P,
    validation_repo: V,
}

impl<P: ProjectRepository, V: ValidationRepository> ProjectService<P, V> {
    pub fn new(project_repo: P, validation_repo: V) -> Self {
        Self {
            project_repo,
            validation_repo,
        }
    }

    /// Create a project. The creator is always a collaborator.
    pub async fn create_project(
        &self,
        creator_id: Uuid,
        input: CreateProject,
    ) -> AgrinetResult<Project> {
        if input.name.trim().is_empty() {
            return Err(AgrinetError::Validation {
                message: "project name must not be empty".into(),
            });
        }
        check_date_rules(input.start_date, input.end_date, input.still_active)?;

        let project = self.project_repo.create(creator_id, input).await?;
        info!(project_id = %project.id, creator_id = %creator_id, "Project created");
        Ok(project)
    }

    pub async fn get_project(&self, id: Uuid) -> AgrinetResult<Project> {
        self.project_repo.get_by_id(id).await
    }

    /// Projects where the user is a collaborator.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        pagination: Pagination,
    ) -> AgrinetResult<PaginatedResult<Project>> {
        self.project_repo.list_by_member(user_id, pagination).await
    }

    /// Add a collaborator. Creator only; fails once any validation
    /// references the project.
    pub async fn add_collaborator(
        &self,
        project_id: Uuid,
        actor: Uuid,
        user_id: Uuid,
    ) -> AgrinetResult<Project> {
        self.require_creator(project_id, actor).await?;
        self.require_unfrozen(project_id).await?;
        let project = self.project_repo.add_collaborator(project_id, user_id).await?;
        info!(project_id = %project_id, user_id = %user_id, "Collaborator added");
        Ok(project)
    }

    /// Remove a collaborator, under the same freeze rule. The creator
    /// cannot be removed.
    pub async fn remove_collaborator(
        &self,
        project_id: Uuid,
        actor: Uuid,
        user_id: Uuid,
    ) -> AgrinetResult<Project> {
        let project = self.require_creator(project_id, actor).await?;
        if user_id == project.creator_id {
            return Err(AgrinetError::InvalidState {
                reason: "project creator cannot be removed".into(),
            });
        }
        self.require_unfrozen(project_id).await?;
        let project = self
            .project_repo
            .remove_collaborator(project_id, user_id)
            .await?;
        info!(project_id = %project_id, user_id = %user_id, "Collaborator removed");
        Ok(project)
    }

    async fn require_creator(&self, project_id: Uuid, actor: Uuid) -> AgrinetResult<Project> {
        let project = self.project_repo.get_by_id(project_id).await?;
        if project.creator_id != actor {
            return Err(AgrinetError::Forbidden {
                reason: "only the project creator may change collaborators".into(),
            });
        }
        Ok(project)
    }

    /// Early freeze check. The storage transaction re-checks
    /// atomically, so a validation created between this check and the
    /// mutation still cannot slip through.
    async fn require_unfrozen(&self, project_id: Uuid) -> AgrinetResult<()> {
        if self.validation_repo.exists_for_project(project_id).await? {
            return Err(AgrinetError::InvalidState {
                reason: "collaborators are frozen once a validation references the project".into(),
            });
        }
        Ok(())
    }
}

/// End date is absent iff the project is still active, and never
/// before the start date.
fn check_date_rules(
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    still_active: bool,
) -> AgrinetResult<()> {
    match (still_active, end_date) {
        (true, Some(_)) => Err(AgrinetError::InvalidDateRange {
            reason: "an active project cannot have an end date".into(),
        }),
        (false, None) => Err(AgrinetError::InvalidDateRange {
            reason: "a finished project requires an end date".into(),
        }),
        (false, Some(end)) if end < start_date => Err(AgrinetError::InvalidDateRange {
            reason: "end date is before start date".into(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn active_project_must_have_no_end_date() {
        let err = check_date_rules(at(2024, 1, 1), Some(at(2024, 6, 1)), true).unwrap_err();
        assert!(matches!(err, AgrinetError::InvalidDateRange { .. }));
    }

    #[test]
    fn finished_project_requires_end_date() {
        let err = check_date_rules(at(2024, 1, 1), None, false).unwrap_err();
        assert!(matches!(err, AgrinetError::InvalidDateRange { .. }));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let err = check_date_rules(at(2024, 6, 1), Some(at(2024, 1, 1)), false).unwrap_err();
        assert!(matches!(err, AgrinetError::InvalidDateRange { .. }));
    }

    #[test]
    fn valid_ranges_pass() {
        assert!(check_date_rules(at(2024, 1, 1), None, true).is_ok());
        assert!(check_date_rules(at(2024, 1, 1), Some(at(2024, 6, 1)), false).is_ok());
        // Single-day projects are fine.
        assert!(check_date_rules(at(2024, 1, 1), Some(at(2024, 1, 1)), false).is_ok());
    }
}
