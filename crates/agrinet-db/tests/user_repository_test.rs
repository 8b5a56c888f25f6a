//! User repository integration tests against an in-memory database.

use agrinet_core::error::AgrinetError;
use agrinet_core::models::user::{CreateUser, UpdateUser, UserRole};
use agrinet_core::repository::{Pagination, UserRepository};
use agrinet_db::repository::SurrealUserRepository;
use argon2::{Argon2, PasswordVerifier};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

fn hash_matches(password: &str, hash: &str) -> bool {
    let parsed = argon2::PasswordHash::new(hash).unwrap();
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

async fn setup() -> SurrealUserRepository<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    agrinet_db::run_migrations(&db).await.unwrap();
    SurrealUserRepository::new(db)
}

fn new_user(email: &str, name: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        name: name.to_string(),
        role: UserRole::Farmer,
        password: "correct-horse-battery".to_string(),
    }
}

#[tokio::test]
async fn create_and_get_by_id() {
    let repo = setup().await;

    let created = repo.create(new_user("alice@example.com", "Alice Fields")).await.unwrap();
    assert_eq!(created.email, "alice@example.com");
    assert!(created.is_active);
    assert!(!created.profile_completed);

    let fetched = repo.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.name, "Alice Fields");
}

#[tokio::test]
async fn password_is_stored_hashed() {
    let repo = setup().await;

    let created = repo.create(new_user("alice@example.com", "Alice")).await.unwrap();
    assert_ne!(created.password_hash, "correct-horse-battery");
    assert!(created.password_hash.starts_with("$argon2id$"));
    assert!(hash_matches("correct-horse-battery", &created.password_hash));
    assert!(!hash_matches("wrong", &created.password_hash));
}

#[tokio::test]
async fn get_by_email_finds_user() {
    let repo = setup().await;
    let created = repo.create(new_user("bob@example.com", "Bob")).await.unwrap();

    let fetched = repo.get_by_email("bob@example.com").await.unwrap();
    assert_eq!(fetched.id, created.id);

    let missing = repo.get_by_email("nobody@example.com").await;
    assert!(matches!(missing, Err(AgrinetError::NotFound { .. })));
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let repo = setup().await;
    repo.create(new_user("dup@example.com", "First")).await.unwrap();

    let second = repo.create(new_user("dup@example.com", "Second")).await;
    assert!(matches!(second, Err(AgrinetError::AlreadyExists { .. })));
}

#[tokio::test]
async fn update_changes_only_provided_fields() {
    let repo = setup().await;
    let created = repo.create(new_user("alice@example.com", "Alice")).await.unwrap();

    let updated = repo
        .update(
            created.id,
            UpdateUser {
                name: Some("Alice Renamed".to_string()),
                role: None,
                is_active: None,
                profile_completed: Some(true),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Alice Renamed");
    assert_eq!(updated.role, UserRole::Farmer);
    assert!(updated.is_active);
    assert!(updated.profile_completed);
}

#[tokio::test]
async fn update_missing_user_is_not_found() {
    let repo = setup().await;

    let result = repo
        .update(
            uuid::Uuid::new_v4(),
            UpdateUser {
                name: Some("Ghost".to_string()),
                role: None,
                is_active: None,
                profile_completed: None,
            },
        )
        .await;
    assert!(matches!(result, Err(AgrinetError::NotFound { .. })));
}

#[tokio::test]
async fn search_with_empty_query_returns_nothing() {
    let repo = setup().await;
    repo.create(new_user("alice@example.com", "Alice")).await.unwrap();

    let result = repo.search("   ", Pagination::default()).await.unwrap();
    assert!(result.items.is_empty());
    assert_eq!(result.total, 0);
}

#[tokio::test]
async fn search_matches_name_substring_and_email_prefix() {
    let repo = setup().await;
    repo.create(new_user("alice@example.com", "Alice Fields")).await.unwrap();
    repo.create(new_user("bob@example.com", "Bob Meadows")).await.unwrap();

    let by_name = repo.search("fields", Pagination::default()).await.unwrap();
    assert_eq!(by_name.total, 1);
    assert_eq!(by_name.items[0].name, "Alice Fields");

    let by_email = repo.search("bob@", Pagination::default()).await.unwrap();
    assert_eq!(by_email.total, 1);
    assert_eq!(by_email.items[0].name, "Bob Meadows");
}

#[tokio::test]
async fn search_excludes_deactivated_users() {
    let repo = setup().await;
    let alice = repo.create(new_user("alice@example.com", "Alice Fields")).await.unwrap();
    repo.update(
        alice.id,
        UpdateUser {
            name: None,
            role: None,
            is_active: Some(false),
            profile_completed: None,
        },
    )
    .await
    .unwrap();

    let result = repo.search("alice", Pagination::default()).await.unwrap();
    assert!(result.items.is_empty());
}

#[tokio::test]
async fn search_paginates_with_total_count() {
    let repo = setup().await;
    for i in 0..5 {
        repo.create(new_user(&format!("farmer{i}@example.com"), &format!("Farmer {i}")))
            .await
            .unwrap();
    }

    let page = repo
        .search("farmer", Pagination { offset: 2, limit: 2 })
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 5);
    assert_eq!(page.offset, 2);
    assert_eq!(page.limit, 2);
}
