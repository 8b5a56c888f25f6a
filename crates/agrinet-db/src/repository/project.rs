//! SurrealDB implementation of [`ProjectRepository`].
//!
//! Collaborator mutations embed the "is this project referenced by a
//! validation" check in the UPDATE statement itself, so the freeze
//! rule cannot race with a concurrent validation insert.

use agrinet_core::error::{AgrinetError, AgrinetResult};
use agrinet_core::models::project::{CreateProject, Project, ProjectType};
use agrinet_core::repository::{PaginatedResult, Pagination, ProjectRepository};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ProjectRow {
    record_id: String,
    creator_id: String,
    name: String,
    project_type: String,
    location: Option<String>,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    still_active: bool,
    description: Option<String>,
    results: Option<String>,
    skills_demonstrated: Vec<String>,
    collaborators: Vec<String>,
    created_at: DateTime<Utc>,
}

impl ProjectRow {
    fn try_into_project(self) -> Result<Project, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        let creator_id = Uuid::parse_str(&self.creator_id)
            .map_err(|e| DbError::Corrupt(format!("invalid creator UUID: {e}")))?;
        let project_type = ProjectType::parse(&self.project_type)
            .ok_or_else(|| DbError::Corrupt(format!("unknown project type: {}", self.project_type)))?;
        let collaborators = self
            .collaborators
            .iter()
            .map(|c| {
                Uuid::parse_str(c)
                    .map_err(|e| DbError::Corrupt(format!("invalid collaborator UUID: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Project {
            id,
            creator_id,
            name: self.name,
            project_type,
            location: self.location,
            start_date: self.start_date,
            end_date: self.end_date,
            still_active: self.still_active,
            description: self.description,
            results: self.results,
            skills_demonstrated: self.skills_demonstrated,
            collaborators,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Project repository.
#[derive(Clone)]
pub struct SurrealProjectRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealProjectRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// Runs a guarded collaborator mutation. The validation-reference
    /// check and the array update execute inside one transaction, so
    /// the freeze cannot be bypassed by a concurrent validation
    /// create.
    async fn mutate_collaborators(
        &self,
        project_id: Uuid,
        user_id: Uuid,
        set_expr: &str,
    ) -> AgrinetResult<Project> {
        let project_id_str = project_id.to_string();

        let query = format!(
            "BEGIN TRANSACTION; \
             LET $refs = (SELECT count() AS total FROM validation \
                 WHERE project_id = $project_id GROUP ALL); \
             IF ($refs[0].total ?? 0) > 0 {{ \
                 THROW 'collaborators_frozen' \
             }}; \
             UPDATE type::record('project', $project_id) SET {set_expr}; \
             COMMIT TRANSACTION;"
        );

        let mut result = self
            .db
            .query(query)
            .bind(("project_id", project_id_str.clone()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let errors = result.take_errors();
        if !errors.is_empty() {
            if errors
                .values()
                .any(|e| e.to_string().contains("collaborators_frozen"))
            {
                return Err(AgrinetError::InvalidState {
                    reason: "project collaborators are frozen once a validation references the project"
                        .into(),
                });
            }
            let msg = errors
                .values()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(DbError::Corrupt(msg).into());
        }

        self.get_by_id(project_id).await
    }
}

impl<C: Connection> ProjectRepository for SurrealProjectRepository<C> {
    async fn create(&self, creator_id: Uuid, input: CreateProject) -> AgrinetResult<Project> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        // Collaborator set always includes the creator.
        let mut collaborators: Vec<String> =
            input.collaborators.iter().map(Uuid::to_string).collect();
        let creator_str = creator_id.to_string();
        if !collaborators.contains(&creator_str) {
            collaborators.insert(0, creator_str.clone());
        }

        let result = self
            .db
            .query(
                "CREATE type::record('project', $id) SET \
                 creator_id = $creator_id, \
                 name = $name, \
                 project_type = $project_type, \
                 location = $location, \
                 start_date = $start_date, \
                 end_date = $end_date, \
                 still_active = $still_active, \
                 description = $description, \
                 results = $results, \
                 skills_demonstrated = $skills_demonstrated, \
                 collaborators = $collaborators",
            )
            .bind(("id", id_str))
            .bind(("creator_id", creator_str))
            .bind(("name", input.name))
            .bind(("project_type", input.project_type.as_str()))
            .bind(("location", input.location))
            .bind(("start_date", input.start_date))
            .bind(("end_date", input.end_date))
            .bind(("still_active", input.still_active))
            .bind(("description", input.description))
            .bind(("results", input.results))
            .bind(("skills_demonstrated", input.skills_demonstrated))
            .bind(("collaborators", collaborators))
            .await
            .map_err(DbError::from)?;

        result
            .check()
            .map_err(|e| DbError::Corrupt(e.to_string()))?;

        self.get_by_id(id).await
    }

    async fn get_by_id(&self, id: Uuid) -> AgrinetResult<Project> {
        let id_str = id.to_string();
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM type::record('project', $id)",
            )
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProjectRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "project".into(),
            id: id_str,
        })?;

        Ok(row.try_into_project()?)
    }

    async fn list_by_member(
        &self,
        user_id: Uuid,
        pagination: Pagination,
    ) -> AgrinetResult<PaginatedResult<Project>> {
        let user_id_str = user_id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM project \
                 WHERE collaborators CONTAINS $user_id \
                 ORDER BY created_at DESC LIMIT $limit START $offset",
            )
            .bind(("user_id", user_id_str.clone()))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProjectRow> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(ProjectRow::try_into_project)
            .collect::<Result<Vec<_>, _>>()?;

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM project \
                 WHERE collaborators CONTAINS $user_id GROUP ALL",
            )
            .bind(("user_id", user_id_str))
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

    async fn add_collaborator(&self, project_id: Uuid, user_id: Uuid) -> AgrinetResult<Project> {
        // Existence check up front so a missing project is NotFound
        // rather than a silent no-op UPDATE.
        let _ = self.get_by_id(project_id).await?;
        self.mutate_collaborators(
            project_id,
            user_id,
            "collaborators = array::union(collaborators, [$user_id])",
        )
        .await
    }

    async fn remove_collaborator(&self, project_id: Uuid, user_id: Uuid) -> AgrinetResult<Project> {
        let _ = self.get_by_id(project_id).await?;
        self.mutate_collaborators(
            project_id,
            user_id,
            "collaborators = array::difference(collaborators, [$user_id])",
        )
        .await
    }
}
