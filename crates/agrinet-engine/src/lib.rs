//! Agrinet Engine — domain services above the repository layer:
//! validation lifecycle, project ledger, profile store, entity
//! directory, service catalog, peer reviews, and the search facade.

pub mod catalog;
pub mod directory;
pub mod notifier;
pub mod profile;
pub mod project;
pub mod review;
pub mod search;
pub mod validation;

pub use catalog::CatalogService;
pub use directory::DirectoryService;
pub use notifier::{InvitationNotifier, NoopInvitationNotifier};
pub use profile::ProfileService;
pub use project::ProjectService;
pub use review::ReviewService;
pub use search::SearchService;
pub use validation::ValidationService;
