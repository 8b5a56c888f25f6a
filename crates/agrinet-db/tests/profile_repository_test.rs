//! Profile repository integration tests against an in-memory database.

use agrinet_core::error::AgrinetError;
use agrinet_core::models::certificate::ImportCertificate;
use agrinet_core::models::profile::{Address, ProfileData, ProfileType, Skill};
use agrinet_core::models::user::{CreateUser, UserRole};
use agrinet_core::repository::{
    CertificateRepository, Pagination, ProfileFilter, ProfileRepository, UserRepository,
};
use agrinet_db::repository::{
    SurrealCertificateRepository, SurrealProfileRepository, SurrealUserRepository,
};
use chrono::{TimeZone, Utc};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    agrinet_db::run_migrations(&db).await.unwrap();
    db
}

fn profile_data(title: &str) -> ProfileData {
    ProfileData {
        profile_type: ProfileType::Individual,
        title: title.to_string(),
        bio: Some("Irrigation specialist with a drip obsession".to_string()),
        phone: None,
        website: None,
        address: Some(Address {
            street: None,
            city: "Fresno".to_string(),
            state: "CA".to_string(),
            country: "US".to_string(),
            postal_code: None,
        }),
        skills: vec![Skill {
            id: Uuid::new_v4(),
            name: "Drip irrigation".to_string(),
            category: "irrigation".to_string(),
            verified: false,
        }],
        experience: vec![],
    }
}

#[tokio::test]
async fn get_before_first_save_is_not_found() {
    let db = setup().await;
    let repo = SurrealProfileRepository::new(db);

    let result = repo.get_by_user(Uuid::new_v4()).await;
    assert!(matches!(result, Err(AgrinetError::NotFound { .. })));
}

#[tokio::test]
async fn upsert_creates_then_replaces() {
    let db = setup().await;
    let repo = SurrealProfileRepository::new(db);
    let user_id = Uuid::new_v4();

    let first = repo.upsert(user_id, profile_data("Agronomist")).await.unwrap();
    assert_eq!(first.title, "Agronomist");
    assert_eq!(first.skills.len(), 1);

    let mut replacement = profile_data("Senior agronomist");
    replacement.bio = None;
    let second = repo.upsert(user_id, replacement).await.unwrap();

    // Same profile record, replaced fields.
    assert_eq!(second.id, first.id);
    assert_eq!(second.title, "Senior agronomist");
    assert!(second.bio.is_none());
}

#[tokio::test]
async fn upsert_replaces_skills_wholesale() {
    let db = setup().await;
    let repo = SurrealProfileRepository::new(db);
    let user_id = Uuid::new_v4();

    repo.upsert(user_id, profile_data("Agronomist")).await.unwrap();

    let mut wiped = profile_data("Agronomist");
    wiped.skills = vec![];
    let result = repo.upsert(user_id, wiped).await.unwrap();
    assert!(result.skills.is_empty());
}

#[tokio::test]
async fn certificates_appear_on_profile() {
    let db = setup().await;
    let profiles = SurrealProfileRepository::new(db.clone());
    let certificates = SurrealCertificateRepository::new(db);
    let user_id = Uuid::new_v4();

    profiles.upsert(user_id, profile_data("Agronomist")).await.unwrap();
    certificates
        .import(ImportCertificate {
            user_id,
            external_id: "cert-1".to_string(),
            name: "Precision Agriculture".to_string(),
            issuing_organization: "AgriCert".to_string(),
            issue_date: Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap(),
            expiry_date: None,
            verification_url: None,
        })
        .await
        .unwrap();

    let profile = profiles.get_by_user(user_id).await.unwrap();
    assert_eq!(profile.certifications.len(), 1);
    assert_eq!(profile.certifications[0].external_id, "cert-1");
}

#[tokio::test]
async fn search_filters_by_role_city_and_skill() {
    let db = setup().await;
    let users = SurrealUserRepository::new(db.clone());
    let profiles = SurrealProfileRepository::new(db);

    let farmer = users
        .create(CreateUser {
            email: "farmer@example.com".to_string(),
            name: "Farmer".to_string(),
            role: UserRole::Farmer,
            password: "correct-horse-battery".to_string(),
        })
        .await
        .unwrap();
    let vet = users
        .create(CreateUser {
            email: "vet@example.com".to_string(),
            name: "Vet".to_string(),
            role: UserRole::Veterinarian,
            password: "correct-horse-battery".to_string(),
        })
        .await
        .unwrap();

    profiles.upsert(farmer.id, profile_data("Row crop farmer")).await.unwrap();
    let mut vet_data = profile_data("Large animal vet");
    vet_data.address = None;
    vet_data.skills = vec![Skill {
        id: Uuid::new_v4(),
        name: "Herd health".to_string(),
        category: "livestock".to_string(),
        verified: false,
    }];
    profiles.upsert(vet.id, vet_data).await.unwrap();

    let by_role = profiles
        .search(
            ProfileFilter {
                role: Some(UserRole::Farmer),
                ..ProfileFilter::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_role.total, 1);
    assert_eq!(by_role.items[0].user_id, farmer.id);

    let by_city = profiles
        .search(
            ProfileFilter {
                city: Some("Fresno".to_string()),
                ..ProfileFilter::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_city.total, 1);
    assert_eq!(by_city.items[0].user_id, farmer.id);

    let by_skill = profiles
        .search(
            ProfileFilter {
                skill: Some("herd".to_string()),
                ..ProfileFilter::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_skill.total, 1);
    assert_eq!(by_skill.items[0].user_id, vet.id);
}

#[tokio::test]
async fn empty_filter_returns_nothing() {
    let db = setup().await;
    let repo = SurrealProfileRepository::new(db);

    let result = repo
        .search(ProfileFilter::default(), Pagination::default())
        .await
        .unwrap();
    assert!(result.items.is_empty());
    assert_eq!(result.total, 0);
}

#[tokio::test]
async fn mark_skill_verified_flips_the_flag() {
    let db = setup().await;
    let repo = SurrealProfileRepository::new(db);
    let user_id = Uuid::new_v4();

    let profile = repo.upsert(user_id, profile_data("Agronomist")).await.unwrap();
    let skill_id = profile.skills[0].id;

    repo.mark_skill_verified(user_id, skill_id).await.unwrap();

    let reloaded = repo.get_by_user(user_id).await.unwrap();
    assert!(reloaded.skills[0].verified);
}

#[tokio::test]
async fn mark_skill_verified_is_a_noop_for_missing_profile_or_skill() {
    let db = setup().await;
    let repo = SurrealProfileRepository::new(db);
    let user_id = Uuid::new_v4();

    // No profile yet.
    repo.mark_skill_verified(user_id, Uuid::new_v4()).await.unwrap();

    // Profile exists but the skill id does not.
    repo.upsert(user_id, profile_data("Agronomist")).await.unwrap();
    repo.mark_skill_verified(user_id, Uuid::new_v4()).await.unwrap();

    let reloaded = repo.get_by_user(user_id).await.unwrap();
    assert!(!reloaded.skills[0].verified);
}
