//! Validation repository integration tests, including the
//! compare-and-set status transition under concurrency.

use agrinet_core::error::AgrinetError;
use agrinet_core::models::validation::{
    ExternalProfileRef, ImpactMetric, ValidationStatus, ValidationSubject, WorkingRelationship,
};
use agrinet_core::repository::{NewValidation, Pagination, ValidationRepository};
use agrinet_db::repository::SurrealValidationRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> SurrealValidationRepository<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    agrinet_db::run_migrations(&db).await.unwrap();
    SurrealValidationRepository::new(db)
}

fn internal_validation(validator_id: Uuid, subject_id: Uuid) -> NewValidation {
    NewValidation {
        validator_id,
        subject: ValidationSubject::Internal {
            user_id: subject_id,
        },
        skill_id: Uuid::new_v4(),
        skill_name: "Drip irrigation".to_string(),
        description: "Designed the drip layout for our 40-acre block".to_string(),
        project_id: None,
        tagged_entities: vec![],
        quantified_results: None,
        impact_metrics: vec![],
        working_relationship: None,
        collaboration_period: None,
    }
}

fn external_validation(validator_id: Uuid) -> NewValidation {
    NewValidation {
        subject: ValidationSubject::External(ExternalProfileRef {
            platform: "linkedin".to_string(),
            platform_id: "ext-123".to_string(),
            name: "Carol Externa".to_string(),
            title: Some("Agronomist".to_string()),
            company: Some("Fields Farm".to_string()),
        }),
        ..internal_validation(validator_id, Uuid::new_v4())
    }
}

#[tokio::test]
async fn create_round_trips_all_fields() {
    let repo = setup().await;
    let validator_id = Uuid::new_v4();
    let project_id = Uuid::new_v4();
    let entity_id = Uuid::new_v4();

    let input = NewValidation {
        project_id: Some(project_id),
        tagged_entities: vec![entity_id],
        quantified_results: Some("30% less water used".to_string()),
        impact_metrics: vec![ImpactMetric::WaterSavings, ImpactMetric::CostReduction],
        working_relationship: Some(WorkingRelationship::Colleague),
        collaboration_period: Some("2023 season".to_string()),
        ..internal_validation(validator_id, Uuid::new_v4())
    };
    let created = repo.create(input).await.unwrap();

    assert_eq!(created.status, ValidationStatus::Pending);
    assert_eq!(created.validator_id, validator_id);
    assert_eq!(created.project_id, Some(project_id));
    assert_eq!(created.tagged_entities, vec![entity_id]);
    assert_eq!(
        created.impact_metrics,
        vec![ImpactMetric::WaterSavings, ImpactMetric::CostReduction]
    );
    assert_eq!(
        created.working_relationship,
        Some(WorkingRelationship::Colleague)
    );

    let fetched = repo.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched.description, created.description);
    assert_eq!(fetched.subject, created.subject);
}

#[tokio::test]
async fn external_subject_round_trips() {
    let repo = setup().await;

    let created = repo.create(external_validation(Uuid::new_v4())).await.unwrap();
    match &created.subject {
        ValidationSubject::External(ext) => {
            assert_eq!(ext.platform, "linkedin");
            assert_eq!(ext.platform_id, "ext-123");
            assert_eq!(ext.name, "Carol Externa");
        }
        other => panic!("expected external subject, got {other:?}"),
    }
}

#[tokio::test]
async fn get_missing_validation_is_not_found() {
    let repo = setup().await;

    let result = repo.get_by_id(Uuid::new_v4()).await;
    assert!(matches!(result, Err(AgrinetError::NotFound { .. })));
}

#[tokio::test]
async fn transition_is_terminal() {
    let repo = setup().await;
    let created = repo
        .create(internal_validation(Uuid::new_v4(), Uuid::new_v4()))
        .await
        .unwrap();

    let approved = repo
        .transition(created.id, ValidationStatus::Approved)
        .await
        .unwrap();
    assert_eq!(approved.status, ValidationStatus::Approved);

    let again = repo.transition(created.id, ValidationStatus::Rejected).await;
    assert!(matches!(again, Err(AgrinetError::InvalidState { .. })));
}

#[tokio::test]
async fn transition_to_pending_is_rejected() {
    let repo = setup().await;
    let created = repo
        .create(internal_validation(Uuid::new_v4(), Uuid::new_v4()))
        .await
        .unwrap();

    let result = repo.transition(created.id, ValidationStatus::Pending).await;
    assert!(matches!(result, Err(AgrinetError::InvalidState { .. })));
}

#[tokio::test]
async fn concurrent_transitions_have_exactly_one_winner() {
    let repo = setup().await;
    let created = repo
        .create(internal_validation(Uuid::new_v4(), Uuid::new_v4()))
        .await
        .unwrap();

    let (approve, reject) = tokio::join!(
        repo.transition(created.id, ValidationStatus::Approved),
        repo.transition(created.id, ValidationStatus::Rejected),
    );

    let winners = [approve.is_ok(), reject.is_ok()]
        .iter()
        .filter(|ok| **ok)
        .count();
    assert_eq!(winners, 1);

    let terminal = repo.get_by_id(created.id).await.unwrap().status;
    assert!(terminal.is_terminal());
}

#[tokio::test]
async fn relink_moves_pending_external_subjects() {
    let repo = setup().await;
    let claimer = Uuid::new_v4();

    let pending = repo.create(external_validation(Uuid::new_v4())).await.unwrap();
    let approved = repo.create(external_validation(Uuid::new_v4())).await.unwrap();
    repo.transition(approved.id, ValidationStatus::Approved)
        .await
        .unwrap();
    // Same platform, different external id: must not be touched.
    let other = repo
        .create(NewValidation {
            subject: ValidationSubject::External(ExternalProfileRef {
                platform: "linkedin".to_string(),
                platform_id: "ext-999".to_string(),
                name: "Someone Else".to_string(),
                title: None,
                company: None,
            }),
            ..internal_validation(Uuid::new_v4(), Uuid::new_v4())
        })
        .await
        .unwrap();

    let relinked = repo
        .relink_external_subject("linkedin", "ext-123", claimer)
        .await
        .unwrap();
    assert_eq!(relinked, 1);

    let claimed = repo.get_by_id(pending.id).await.unwrap();
    assert_eq!(
        claimed.subject,
        ValidationSubject::Internal { user_id: claimer }
    );

    let untouched = repo.get_by_id(other.id).await.unwrap();
    assert!(matches!(untouched.subject, ValidationSubject::External(_)));
}

#[tokio::test]
async fn relink_with_no_matches_returns_zero() {
    let repo = setup().await;

    let relinked = repo
        .relink_external_subject("linkedin", "ext-123", Uuid::new_v4())
        .await
        .unwrap();
    assert_eq!(relinked, 0);
}

#[tokio::test]
async fn exists_for_project_reflects_references() {
    let repo = setup().await;
    let project_id = Uuid::new_v4();

    assert!(!repo.exists_for_project(project_id).await.unwrap());

    repo.create(NewValidation {
        project_id: Some(project_id),
        ..internal_validation(Uuid::new_v4(), Uuid::new_v4())
    })
    .await
    .unwrap();

    assert!(repo.exists_for_project(project_id).await.unwrap());
    assert!(!repo.exists_for_project(Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn received_and_authored_lists_are_scoped() {
    let repo = setup().await;
    let validator = Uuid::new_v4();
    let subject = Uuid::new_v4();

    repo.create(internal_validation(validator, subject)).await.unwrap();
    repo.create(internal_validation(validator, Uuid::new_v4()))
        .await
        .unwrap();
    repo.create(internal_validation(Uuid::new_v4(), subject))
        .await
        .unwrap();

    let received = repo
        .list_received(subject, Pagination::default())
        .await
        .unwrap();
    assert_eq!(received.total, 2);
    assert!(received.items.iter().all(|v| v.subject
        == ValidationSubject::Internal {
            user_id: subject
        }));

    let authored = repo
        .list_authored(validator, Pagination::default())
        .await
        .unwrap();
    assert_eq!(authored.total, 2);
    assert!(authored.items.iter().all(|v| v.validator_id == validator));
}
