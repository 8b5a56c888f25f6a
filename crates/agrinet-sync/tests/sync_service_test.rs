//! Integration tests for the sync service against a mock external API
//! and an in-memory database.

use agrinet_core::error::AgrinetError;
use agrinet_core::models::profile::{ProfileData, ProfileType};
use agrinet_core::models::user::{CreateUser, User, UserRole};
use agrinet_core::repository::{ProfileRepository, UserRepository};
use agrinet_db::repository::{
    SurrealAccountLinkRepository, SurrealCertificateRepository, SurrealProfileRepository,
    SurrealUserRepository,
};
use agrinet_sync::client::{SyncClient, SyncConfig};
use agrinet_sync::service::SyncService;
use serde_json::json;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup_db() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    agrinet_db::run_migrations(&db).await.unwrap();
    db
}

async fn create_user(db: &Surreal<Db>) -> User {
    SurrealUserRepository::new(db.clone())
        .create(CreateUser {
            email: "alice@example.com".into(),
            name: "Alice Fields".into(),
            role: UserRole::Farmer,
            password: "correct-horse-battery".into(),
        })
        .await
        .unwrap()
}

fn service(
    db: &Surreal<Db>,
    server: &MockServer,
) -> SyncService<
    SurrealAccountLinkRepository<Db>,
    SurrealCertificateRepository<Db>,
    SurrealProfileRepository<Db>,
> {
    let client = SyncClient::new(SyncConfig {
        base_url: server.uri(),
        timeout_secs: 5,
    })
    .unwrap();
    SyncService::new(
        client,
        SurrealAccountLinkRepository::new(db.clone()),
        SurrealCertificateRepository::new(db.clone()),
        SurrealProfileRepository::new(db.clone()),
    )
}

fn profile_body() -> serde_json::Value {
    json!({
        "id": "ext-123",
        "name": "Alice Fields",
        "headline": "Irrigation specialist",
        "company": "Fields Farm",
        "profile_url": "https://linkedin.example/in/alice",
        "positions": [
            {
                "title": "Farm manager",
                "company": "Fields Farm",
                "start_date": "2020-01-01T00:00:00Z",
                "end_date": null,
                "location": "Fresno, CA",
                "description": null
            }
        ]
    })
}

async fn mount_profile(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v2/people/ext-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn connect_snapshots_display_fields() {
    let db = setup_db().await;
    let alice = create_user(&db).await;
    let server = MockServer::start().await;
    mount_profile(&server).await;

    let svc = service(&db, &server);
    let link = svc.connect(alice.id, "ext-123").await.unwrap();

    assert_eq!(link.platform, "linkedin");
    assert_eq!(link.platform_id, "ext-123");
    assert_eq!(link.display_name.as_deref(), Some("Alice Fields"));

    let fetched = svc.get_link(alice.id).await.unwrap().unwrap();
    assert_eq!(fetched.id, link.id);
}

#[tokio::test]
async fn disconnect_is_idempotent() {
    let db = setup_db().await;
    let alice = create_user(&db).await;
    let server = MockServer::start().await;
    mount_profile(&server).await;

    let svc = service(&db, &server);
    svc.connect(alice.id, "ext-123").await.unwrap();

    svc.disconnect(alice.id).await.unwrap();
    assert!(svc.get_link(alice.id).await.unwrap().is_none());

    // Disconnecting again is a no-op, not an error.
    svc.disconnect(alice.id).await.unwrap();
}

#[tokio::test]
async fn import_certificates_dedupes_by_external_id() {
    let db = setup_db().await;
    let alice = create_user(&db).await;
    let server = MockServer::start().await;
    mount_profile(&server).await;

    Mock::given(method("GET"))
        .and(path("/v2/people/ext-123/certifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "cert-1",
                "name": "Precision Agriculture Fundamentals",
                "issuing_organization": "LinkedIn Learning",
                "issue_date": "2023-05-01T00:00:00Z",
                "expiry_date": null,
                "verification_url": null
            },
            {
                "id": "cert-2",
                "name": "Soil Health Management",
                "issuing_organization": "LinkedIn Learning",
                "issue_date": "2023-08-15T00:00:00Z",
                "expiry_date": null,
                "verification_url": "https://linkedin.example/certs/cert-2"
            }
        ])))
        .mount(&server)
        .await;

    let svc = service(&db, &server);
    svc.connect(alice.id, "ext-123").await.unwrap();

    let first = svc.import_certificates(alice.id).await.unwrap();
    assert_eq!(first.len(), 2);

    // Re-import is a no-op.
    let second = svc.import_certificates(alice.id).await.unwrap();
    assert!(second.is_empty());
}

#[tokio::test]
async fn import_without_link_fails() {
    let db = setup_db().await;
    let alice = create_user(&db).await;
    let server = MockServer::start().await;

    let svc = service(&db, &server);
    let err = svc.import_certificates(alice.id).await.unwrap_err();
    assert!(matches!(err, AgrinetError::NotFound { .. }));
}

#[tokio::test]
async fn sync_experience_merges_and_dedupes() {
    let db = setup_db().await;
    let alice = create_user(&db).await;
    let server = MockServer::start().await;
    mount_profile(&server).await;

    SurrealProfileRepository::new(db.clone())
        .upsert(
            alice.id,
            ProfileData {
                profile_type: ProfileType::Individual,
                title: "Farmer".into(),
                bio: None,
                phone: None,
                website: None,
                address: None,
                skills: Vec::new(),
                experience: Vec::new(),
            },
        )
        .await
        .unwrap();

    let svc = service(&db, &server);
    svc.connect(alice.id, "ext-123").await.unwrap();

    let added = svc.sync_experience(alice.id).await.unwrap();
    assert_eq!(added, 1);

    let profile = SurrealProfileRepository::new(db.clone())
        .get_by_user(alice.id)
        .await
        .unwrap();
    assert_eq!(profile.experience.len(), 1);
    assert_eq!(profile.experience[0].position, "Farm manager");
    assert!(profile.experience[0].still_active);

    // Running the sync again adds nothing.
    let added = svc.sync_experience(alice.id).await.unwrap();
    assert_eq!(added, 0);
}

#[tokio::test]
async fn upstream_errors_are_retryable() {
    let db = setup_db().await;
    let alice = create_user(&db).await;
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/people/ext-123"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let svc = service(&db, &server);
    let err = svc.connect(alice.id, "ext-123").await.unwrap_err();
    assert!(matches!(
        err,
        AgrinetError::ExternalServiceUnavailable { .. }
    ));
}

#[tokio::test]
async fn unknown_external_profile_is_not_found() {
    let db = setup_db().await;
    let alice = create_user(&db).await;
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/people/ext-999"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let svc = service(&db, &server);
    let err = svc.connect(alice.id, "ext-999").await.unwrap_err();
    assert!(matches!(err, AgrinetError::NotFound { .. }));
}

#[tokio::test]
async fn external_profile_search_proxies_query() {
    let db = setup_db().await;
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/people"))
        .and(query_param("q", "alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([profile_body()])))
        .mount(&server)
        .await;

    let svc = service(&db, &server);
    let found = svc.search_external_profiles("alice").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Alice Fields");

    // Empty query never hits the upstream.
    let found = svc.search_external_profiles("   ").await.unwrap();
    assert!(found.is_empty());
}
