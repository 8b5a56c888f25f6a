//! Integration tests for the project ledger.

use agrinet_core::error::AgrinetError;
use agrinet_core::models::project::{CreateProject, ProjectType};
use agrinet_core::models::user::{CreateUser, User, UserRole};
use agrinet_core::models::validation::ValidationSubject;
use agrinet_core::repository::{NewValidation, Pagination, UserRepository, ValidationRepository};
use agrinet_engine::project::ProjectService;
use chrono::{DateTime, TimeZone, Utc};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

use agrinet_db::repository::{
    SurrealProjectRepository, SurrealUserRepository, SurrealValidationRepository,
};

async fn setup_db() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    agrinet_db::run_migrations(&db).await.unwrap();
    db
}

async fn create_user(db: &Surreal<Db>, email: &str, name: &str) -> User {
    SurrealUserRepository::new(db.clone())
        .create(CreateUser {
            email: email.into(),
            name: name.into(),
            role: UserRole::Farmer,
            password: "correct-horse-battery".into(),
        })
        .await
        .unwrap()
}

fn svc(
    db: &Surreal<Db>,
) -> ProjectService<SurrealProjectRepository<Db>, SurrealValidationRepository<Db>> {
    ProjectService::new(
        SurrealProjectRepository::new(db.clone()),
        SurrealValidationRepository::new(db.clone()),
    )
}

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn active_project(name: &str) -> CreateProject {
    CreateProject {
        name: name.into(),
        project_type: ProjectType::Irrigation,
        location: Some("North field".into()),
        start_date: at(2024, 3, 1),
        end_date: None,
        still_active: true,
        description: None,
        results: None,
        skills_demonstrated: vec!["drip irrigation".into()],
        collaborators: Vec::new(),
    }
}

#[tokio::test]
async fn creator_is_always_a_collaborator() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com", "Alice").await;
    let svc = svc(&db);

    let project = svc
        .create_project(alice.id, active_project("North field irrigation"))
        .await
        .unwrap();

    assert_eq!(project.creator_id, alice.id);
    assert!(project.is_collaborator(alice.id));
}

#[tokio::test]
async fn date_rules_are_enforced() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com", "Alice").await;
    let svc = svc(&db);

    // Active project with an end date.
    let mut input = active_project("Bad dates 1");
    input.end_date = Some(at(2024, 6, 1));
    let err = svc.create_project(alice.id, input).await.unwrap_err();
    assert!(matches!(err, AgrinetError::InvalidDateRange { .. }));

    // Finished project ending before it starts.
    let mut input = active_project("Bad dates 2");
    input.still_active = false;
    input.end_date = Some(at(2024, 1, 1));
    let err = svc.create_project(alice.id, input).await.unwrap_err();
    assert!(matches!(err, AgrinetError::InvalidDateRange { .. }));
}

#[tokio::test]
async fn only_creator_manages_collaborators() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com", "Alice").await;
    let bob = create_user(&db, "bob@example.com", "Bob").await;
    let svc = svc(&db);

    let project = svc
        .create_project(alice.id, active_project("North field irrigation"))
        .await
        .unwrap();

    let err = svc
        .add_collaborator(project.id, bob.id, bob.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AgrinetError::Forbidden { .. }));

    let project = svc
        .add_collaborator(project.id, alice.id, bob.id)
        .await
        .unwrap();
    assert!(project.is_collaborator(bob.id));
}

#[tokio::test]
async fn creator_cannot_be_removed() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com", "Alice").await;
    let svc = svc(&db);

    let project = svc
        .create_project(alice.id, active_project("North field irrigation"))
        .await
        .unwrap();

    let err = svc
        .remove_collaborator(project.id, alice.id, alice.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AgrinetError::InvalidState { .. }));
}

#[tokio::test]
async fn collaborators_freeze_once_referenced() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com", "Alice").await;
    let bob = create_user(&db, "bob@example.com", "Bob").await;
    let carol = create_user(&db, "carol@example.com", "Carol").await;
    let svc = svc(&db);

    let mut input = active_project("North field irrigation");
    input.collaborators = vec![bob.id];
    let project = svc.create_project(alice.id, input).await.unwrap();

    // A validation references the project.
    SurrealValidationRepository::new(db.clone())
        .create(NewValidation {
            validator_id: alice.id,
            subject: ValidationSubject::Internal { user_id: bob.id },
            skill_id: Uuid::new_v4(),
            skill_name: "Drip irrigation design".into(),
            description: "Joint work on the north field.".into(),
            project_id: Some(project.id),
            tagged_entities: Vec::new(),
            quantified_results: None,
            impact_metrics: Vec::new(),
            working_relationship: None,
            collaboration_period: None,
        })
        .await
        .unwrap();

    // The collaborator set is now frozen, both ways.
    let err = svc
        .add_collaborator(project.id, alice.id, carol.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AgrinetError::InvalidState { .. }));

    let err = svc
        .remove_collaborator(project.id, alice.id, bob.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AgrinetError::InvalidState { .. }));
}

#[tokio::test]
async fn list_for_user_returns_memberships() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com", "Alice").await;
    let bob = create_user(&db, "bob@example.com", "Bob").await;
    let svc = svc(&db);

    let mut input = active_project("Shared project");
    input.collaborators = vec![bob.id];
    let shared = svc.create_project(alice.id, input).await.unwrap();
    svc.create_project(alice.id, active_project("Solo project"))
        .await
        .unwrap();

    let bobs = svc
        .list_for_user(bob.id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(bobs.items.len(), 1);
    assert_eq!(bobs.items[0].id, shared.id);

    let alices = svc
        .list_for_user(alice.id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(alices.items.len(), 2);
}

// A validation referencing no project never freezes anything.
#[tokio::test]
async fn unreferenced_projects_stay_mutable() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com", "Alice").await;
    let bob = create_user(&db, "bob@example.com", "Bob").await;
    let svc = svc(&db);

    let project = svc
        .create_project(alice.id, active_project("North field irrigation"))
        .await
        .unwrap();

    SurrealValidationRepository::new(db.clone())
        .create(NewValidation {
            validator_id: alice.id,
            subject: ValidationSubject::Internal { user_id: bob.id },
            skill_id: Uuid::new_v4(),
            skill_name: "Soil analysis".into(),
            description: "Independent of any project.".into(),
            project_id: None,
            tagged_entities: Vec::new(),
            quantified_results: None,
            impact_metrics: Vec::new(),
            working_relationship: None,
            collaboration_period: None,
        })
        .await
        .unwrap();

    let project = svc
        .add_collaborator(project.id, alice.id, bob.id)
        .await
        .unwrap();
    assert!(project.is_collaborator(bob.id));
}
