//! Shared application state: services wired over concrete SurrealDB
//! repositories.

use std::sync::Arc;

use agrinet_auth::{AuthConfig, AuthService};
use agrinet_core::error::AgrinetError;
use agrinet_db::repository::{
    SurrealAccountLinkRepository, SurrealCertificateRepository, SurrealEntityRepository,
    SurrealProfileRepository, SurrealProjectRepository, SurrealReviewRepository,
    SurrealServiceRepository, SurrealSessionRepository, SurrealUserRepository,
    SurrealValidationRepository,
};
use agrinet_engine::{
    CatalogService, DirectoryService, ProfileService, ProjectService, ReviewService,
    SearchService, ValidationService,
};
use agrinet_sync::{HttpInvitationNotifier, SyncClient, SyncConfig, SyncService};
use surrealdb::Surreal;
use surrealdb::engine::remote::ws::Client;

type Db = Client;

pub type Auth = AuthService<SurrealUserRepository<Db>, SurrealSessionRepository<Db>>;
pub type Validations = ValidationService<
    SurrealValidationRepository<Db>,
    SurrealProjectRepository<Db>,
    SurrealEntityRepository<Db>,
    SurrealProfileRepository<Db>,
    SurrealUserRepository<Db>,
    HttpInvitationNotifier,
>;
pub type Projects =
    ProjectService<SurrealProjectRepository<Db>, SurrealValidationRepository<Db>>;
pub type Profiles = ProfileService<SurrealProfileRepository<Db>>;
pub type Catalog = CatalogService<SurrealServiceRepository<Db>>;
pub type Directory = DirectoryService<SurrealEntityRepository<Db>>;
pub type Reviews = ReviewService<SurrealReviewRepository<Db>, SurrealUserRepository<Db>>;
pub type Search = SearchService<
    SurrealUserRepository<Db>,
    SurrealProfileRepository<Db>,
    SurrealEntityRepository<Db>,
    SurrealServiceRepository<Db>,
>;
pub type Sync = SyncService<
    SurrealAccountLinkRepository<Db>,
    SurrealCertificateRepository<Db>,
    SurrealProfileRepository<Db>,
>;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<Auth>,
    pub validations: Arc<Validations>,
    pub projects: Arc<Projects>,
    pub profiles: Arc<Profiles>,
    pub catalog: Arc<Catalog>,
    pub directory: Arc<Directory>,
    pub reviews: Arc<Reviews>,
    pub search: Arc<Search>,
    pub sync: Arc<Sync>,
}

impl AppState {
    pub fn build(
        db: Surreal<Db>,
        auth_config: AuthConfig,
        sync_config: SyncConfig,
    ) -> Result<Self, AgrinetError> {
        let user_repo = match auth_config.pepper.clone() {
            Some(pepper) => SurrealUserRepository::with_pepper(db.clone(), pepper),
            None => SurrealUserRepository::new(db.clone()),
        };
        let session_repo = SurrealSessionRepository::new(db.clone());
        let profile_repo = SurrealProfileRepository::new(db.clone());
        let entity_repo = SurrealEntityRepository::new(db.clone());
        let project_repo = SurrealProjectRepository::new(db.clone());
        let validation_repo = SurrealValidationRepository::new(db.clone());
        let service_repo = SurrealServiceRepository::new(db.clone());
        let review_repo = SurrealReviewRepository::new(db.clone());
        let link_repo = SurrealAccountLinkRepository::new(db.clone());
        let certificate_repo = SurrealCertificateRepository::new(db.clone());

        let sync_client =
            SyncClient::new(sync_config).map_err(|e| AgrinetError::Internal(e.to_string()))?;
        let notifier = HttpInvitationNotifier::new(sync_client.clone());

        Ok(Self {
            auth: Arc::new(AuthService::new(
                user_repo.clone(),
                session_repo,
                auth_config,
            )),
            validations: Arc::new(ValidationService::new(
                validation_repo.clone(),
                project_repo.clone(),
                entity_repo.clone(),
                profile_repo.clone(),
                user_repo.clone(),
                notifier,
            )),
            projects: Arc::new(ProjectService::new(project_repo, validation_repo)),
            profiles: Arc::new(ProfileService::new(profile_repo.clone())),
            catalog: Arc::new(CatalogService::new(service_repo.clone())),
            directory: Arc::new(DirectoryService::new(entity_repo.clone())),
            reviews: Arc::new(ReviewService::new(review_repo, user_repo.clone())),
            search: Arc::new(SearchService::new(
                user_repo,
                profile_repo.clone(),
                entity_repo,
                service_repo,
            )),
            sync: Arc::new(SyncService::new(
                sync_client,
                link_repo,
                certificate_repo,
                profile_repo,
            )),
        })
    }
}
