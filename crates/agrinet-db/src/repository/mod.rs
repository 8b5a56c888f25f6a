//! SurrealDB repository implementations.

mod account_link;
mod certificate;
mod entity;
mod profile;
mod project;
mod review;
mod service;
mod session;
mod user;
mod validation;

pub use account_link::SurrealAccountLinkRepository;
pub use certificate::SurrealCertificateRepository;
pub use entity::SurrealEntityRepository;
pub use profile::SurrealProfileRepository;
pub use project::SurrealProjectRepository;
pub use review::SurrealReviewRepository;
pub use service::SurrealServiceRepository;
pub use session::SurrealSessionRepository;
pub use user::SurrealUserRepository;
pub use validation::SurrealValidationRepository;
