//! Integration tests for the validation engine against an in-memory
//! database.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use agrinet_core::error::{AgrinetError, AgrinetResult};
use agrinet_core::models::entity::{CreateEntity, EntityDetails, EntityTag};
use agrinet_core::models::profile::{ProfileData, ProfileType, Skill};
use agrinet_core::models::project::{CreateProject, ProjectType};
use agrinet_core::models::user::{CreateUser, User, UserRole};
use agrinet_core::models::validation::{
    CreateValidation, ExternalProfileRef, ValidationStatus, ValidationSubject,
};
use agrinet_core::repository::{
    EntityRepository, Pagination, ProfileRepository, ProjectRepository, UserRepository,
};
use agrinet_engine::notifier::{InvitationNotifier, NoopInvitationNotifier};
use agrinet_engine::validation::ValidationService;
use chrono::{TimeZone, Utc};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

use agrinet_db::repository::{
    SurrealEntityRepository, SurrealProfileRepository, SurrealProjectRepository,
    SurrealUserRepository, SurrealValidationRepository,
};

/// Notifier that counts invitations and optionally fails.
#[derive(Clone)]
struct RecordingNotifier {
    sent: Arc<AtomicUsize>,
    fail: bool,
}

impl RecordingNotifier {
    fn new(fail: bool) -> Self {
        Self {
            sent: Arc::new(AtomicUsize::new(0)),
            fail,
        }
    }

    fn sent(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }
}

impl InvitationNotifier for RecordingNotifier {
    async fn invite(
        &self,
        _subject: &ExternalProfileRef,
        _validator_name: &str,
        _skill_name: &str,
    ) -> AgrinetResult<()> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AgrinetError::ExternalServiceUnavailable {
                service: "linkedin".into(),
                reason: "connection refused".into(),
            });
        }
        Ok(())
    }
}

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

fn engine<N: InvitationNotifier>(
    db: &Surreal<Db>,
    notifier: N,
) -> ValidationService<
    SurrealValidationRepository<Db>,
    SurrealProjectRepository<Db>,
    SurrealEntityRepository<Db>,
    SurrealProfileRepository<Db>,
    SurrealUserRepository<Db>,
    N,
> {
    ValidationService::new(
        SurrealValidationRepository::new(db.clone()),
        SurrealProjectRepository::new(db.clone()),
        SurrealEntityRepository::new(db.clone()),
        SurrealProfileRepository::new(db.clone()),
        SurrealUserRepository::new(db.clone()),
        notifier,
    )
}

fn internal_validation(subject_id: Uuid) -> CreateValidation {
    CreateValidation {
        subject: ValidationSubject::Internal {
            user_id: subject_id,
        },
        skill_id: Uuid::new_v4(),
        skill_name: "Drip irrigation design".into(),
        description: "Designed and installed the drip system on the north field.".into(),
        project_id: None,
        tagged_entities: Vec::new(),
        quantified_results: None,
        impact_metrics: Vec::new(),
        working_relationship: None,
        collaboration_period: None,
    }
}

fn external_ref() -> ExternalProfileRef {
    ExternalProfileRef {
        platform: "linkedin".into(),
        platform_id: "ext-123".into(),
        name: "Carol Externa".into(),
        title: Some("Agronomist".into()),
        company: None,
    }
}

#[tokio::test]
async fn self_validation_is_rejected() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com", "Alice").await;
    let svc = engine(&db, NoopInvitationNotifier);

    let err = svc
        .create_validation(&alice, internal_validation(alice.id))
        .await
        .unwrap_err();

    assert!(matches!(err, AgrinetError::InvalidSubject { .. }));
}

#[tokio::test]
async fn unknown_internal_subject_is_rejected() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com", "Alice").await;
    let svc = engine(&db, NoopInvitationNotifier);

    // The subject id does not belong to any account; the record must
    // not be created, or it would sit pending with nobody to act.
    let err = svc
        .create_validation(&alice, internal_validation(Uuid::new_v4()))
        .await
        .unwrap_err();

    assert!(matches!(err, AgrinetError::NotFound { .. }));
}

#[tokio::test]
async fn empty_description_is_rejected() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com", "Alice").await;
    let bob = create_user(&db, "bob@example.com", "Bob").await;
    let svc = engine(&db, NoopInvitationNotifier);

    let mut input = internal_validation(bob.id);
    input.description = "   ".into();

    let err = svc.create_validation(&alice, input).await.unwrap_err();
    assert!(matches!(err, AgrinetError::Validation { .. }));
}

#[tokio::test]
async fn validation_starts_pending() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com", "Alice").await;
    let bob = create_user(&db, "bob@example.com", "Bob").await;
    let svc = engine(&db, NoopInvitationNotifier);

    let validation = svc
        .create_validation(&alice, internal_validation(bob.id))
        .await
        .unwrap();

    assert_eq!(validation.status, ValidationStatus::Pending);
    assert_eq!(validation.validator_id, alice.id);
    assert_eq!(validation.subject.internal_user_id(), Some(bob.id));
}

#[tokio::test]
async fn approve_by_subject_succeeds_and_is_terminal() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com", "Alice").await;
    let bob = create_user(&db, "bob@example.com", "Bob").await;
    let svc = engine(&db, NoopInvitationNotifier);

    let validation = svc
        .create_validation(&alice, internal_validation(bob.id))
        .await
        .unwrap();

    let approved = svc.approve(validation.id, bob.id).await.unwrap();
    assert_eq!(approved.status, ValidationStatus::Approved);

    // Terminal: a second transition fails.
    let err = svc.reject(validation.id, bob.id).await.unwrap_err();
    assert!(matches!(err, AgrinetError::InvalidState { .. }));
}

#[tokio::test]
async fn only_the_subject_may_act() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com", "Alice").await;
    let bob = create_user(&db, "bob@example.com", "Bob").await;
    let mallory = create_user(&db, "mallory@example.com", "Mallory").await;
    let svc = engine(&db, NoopInvitationNotifier);

    let validation = svc
        .create_validation(&alice, internal_validation(bob.id))
        .await
        .unwrap();

    let err = svc.approve(validation.id, mallory.id).await.unwrap_err();
    assert!(matches!(err, AgrinetError::Forbidden { .. }));

    // The validator cannot approve their own authored validation
    // either.
    let err = svc.approve(validation.id, alice.id).await.unwrap_err();
    assert!(matches!(err, AgrinetError::Forbidden { .. }));
}

#[tokio::test]
async fn approve_marks_profile_skill_verified() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com", "Alice").await;
    let bob = create_user(&db, "bob@example.com", "Bob").await;

    let skill_id = Uuid::new_v4();
    let profile_repo = SurrealProfileRepository::new(db.clone());
    profile_repo
        .upsert(
            bob.id,
            ProfileData {
                profile_type: ProfileType::Individual,
                title: "Irrigation specialist".into(),
                bio: None,
                phone: None,
                website: None,
                address: None,
                skills: vec![Skill {
                    id: skill_id,
                    name: "Drip irrigation design".into(),
                    category: "irrigation".into(),
                    verified: false,
                }],
                experience: Vec::new(),
            },
        )
        .await
        .unwrap();

    let svc = engine(&db, NoopInvitationNotifier);
    let mut input = internal_validation(bob.id);
    input.skill_id = skill_id;

    let validation = svc.create_validation(&alice, input).await.unwrap();
    svc.approve(validation.id, bob.id).await.unwrap();

    let profile = profile_repo.get_by_user(bob.id).await.unwrap();
    assert!(profile.skills[0].verified);
}

#[tokio::test]
async fn external_subject_sends_invitation() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com", "Alice").await;
    let notifier = RecordingNotifier::new(false);
    let svc = engine(&db, notifier.clone());

    let mut input = internal_validation(Uuid::new_v4());
    input.subject = ValidationSubject::External(external_ref());

    let validation = svc.create_validation(&alice, input).await.unwrap();
    assert_eq!(validation.status, ValidationStatus::Pending);
    assert_eq!(notifier.sent(), 1);
}

#[tokio::test]
async fn notifier_failure_does_not_roll_back() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com", "Alice").await;
    let notifier = RecordingNotifier::new(true);
    let svc = engine(&db, notifier.clone());

    let mut input = internal_validation(Uuid::new_v4());
    input.subject = ValidationSubject::External(external_ref());

    let validation = svc.create_validation(&alice, input).await.unwrap();
    assert_eq!(notifier.sent(), 1);

    // Still persisted despite the delivery failure.
    let fetched = svc.get_validation(validation.id).await.unwrap();
    assert_eq!(fetched.status, ValidationStatus::Pending);
}

#[tokio::test]
async fn external_subject_is_not_actionable_until_claimed() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com", "Alice").await;
    let svc = engine(&db, NoopInvitationNotifier);

    let mut input = internal_validation(Uuid::new_v4());
    input.subject = ValidationSubject::External(external_ref());
    let validation = svc.create_validation(&alice, input).await.unwrap();

    let err = svc.approve(validation.id, alice.id).await.unwrap_err();
    assert!(matches!(err, AgrinetError::Forbidden { .. }));
}

#[tokio::test]
async fn claiming_relinks_and_makes_actionable() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com", "Alice").await;
    let svc = engine(&db, NoopInvitationNotifier);

    let mut input = internal_validation(Uuid::new_v4());
    input.subject = ValidationSubject::External(external_ref());
    let validation = svc.create_validation(&alice, input).await.unwrap();

    // Carol registers and claims her snapshot.
    let carol = create_user(&db, "carol@example.com", "Carol Externa").await;
    let relinked = svc
        .claim_external_subject("linkedin", "ext-123", carol.id)
        .await
        .unwrap();
    assert_eq!(relinked, 1);

    // Now carol can approve it, and it shows up in her received list.
    let approved = svc.approve(validation.id, carol.id).await.unwrap();
    assert_eq!(approved.status, ValidationStatus::Approved);

    let received = svc
        .list_received(carol.id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(received.items.len(), 1);
    assert_eq!(received.items[0].id, validation.id);
}

#[tokio::test]
async fn project_membership_is_enforced() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com", "Alice").await;
    let bob = create_user(&db, "bob@example.com", "Bob").await;
    let outsider = create_user(&db, "eve@example.com", "Eve").await;

    let project_repo = SurrealProjectRepository::new(db.clone());
    let project = project_repo
        .create(
            alice.id,
            CreateProject {
                name: "North field irrigation".into(),
                project_type: ProjectType::Irrigation,
                location: None,
                start_date: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
                end_date: None,
                still_active: true,
                description: None,
                results: None,
                skills_demonstrated: Vec::new(),
                collaborators: vec![bob.id],
            },
        )
        .await
        .unwrap();

    let svc = engine(&db, NoopInvitationNotifier);

    // Validator not in the project.
    let mut input = internal_validation(bob.id);
    input.project_id = Some(project.id);
    let err = svc.create_validation(&outsider, input).await.unwrap_err();
    assert!(matches!(err, AgrinetError::NotACollaborator { .. }));

    // Internal subject not in the project.
    let mut input = internal_validation(outsider.id);
    input.project_id = Some(project.id);
    let err = svc.create_validation(&alice, input).await.unwrap_err();
    assert!(matches!(err, AgrinetError::NotACollaborator { .. }));

    // Both in the project: accepted.
    let mut input = internal_validation(bob.id);
    input.project_id = Some(project.id);
    let validation = svc.create_validation(&alice, input).await.unwrap();
    assert_eq!(validation.project_id, Some(project.id));
}

#[tokio::test]
async fn inline_tags_auto_create_and_dedupe() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com", "Alice").await;
    let bob = create_user(&db, "bob@example.com", "Bob").await;
    let svc = engine(&db, NoopInvitationNotifier);

    let inline_tag = |name: &str| {
        EntityTag::Inline(CreateEntity {
            name: name.into(),
            details: EntityDetails::Product {
                category: Some("irrigation".into()),
                brand: None,
                model: None,
            },
        })
    };

    let mut input = internal_validation(bob.id);
    input.tagged_entities = vec![inline_tag("DripMaster 3000")];
    let first = svc.create_validation(&alice, input).await.unwrap();
    assert_eq!(first.tagged_entities.len(), 1);

    // Same product, different case: resolves to the same entity.
    let mut input = internal_validation(bob.id);
    input.tagged_entities = vec![inline_tag("dripmaster 3000")];
    let second = svc.create_validation(&alice, input).await.unwrap();

    assert_eq!(first.tagged_entities, second.tagged_entities);

    let entity_repo = SurrealEntityRepository::new(db.clone());
    let entity = entity_repo.get_by_id(first.tagged_entities[0]).await.unwrap();
    assert_eq!(entity.name, "DripMaster 3000");
}

#[tokio::test]
async fn dangling_entity_tag_is_rejected() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com", "Alice").await;
    let bob = create_user(&db, "bob@example.com", "Bob").await;
    let svc = engine(&db, NoopInvitationNotifier);

    let mut input = internal_validation(bob.id);
    input.tagged_entities = vec![EntityTag::Existing {
        entity_id: Uuid::new_v4(),
    }];

    let err = svc.create_validation(&alice, input).await.unwrap_err();
    assert!(matches!(err, AgrinetError::NotFound { .. }));
}

#[tokio::test]
async fn authored_and_received_lists_are_newest_first() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com", "Alice").await;
    let bob = create_user(&db, "bob@example.com", "Bob").await;
    let svc = engine(&db, NoopInvitationNotifier);

    let mut first = internal_validation(bob.id);
    first.skill_name = "Soil analysis".into();
    let first = svc.create_validation(&alice, first).await.unwrap();
    let second = svc
        .create_validation(&alice, internal_validation(bob.id))
        .await
        .unwrap();

    let authored = svc
        .list_authored(alice.id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(authored.items.len(), 2);
    assert_eq!(authored.items[0].id, second.id);
    assert_eq!(authored.items[1].id, first.id);

    let received = svc
        .list_received(bob.id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(received.items.len(), 2);
    assert_eq!(received.total, 2);
}
