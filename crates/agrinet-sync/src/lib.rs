//! Agrinet Sync — adapter for pulling profile, certificate, and
//! position data from an external professional network, plus
//! invitation delivery for external validation subjects.

pub mod client;
pub mod error;
pub mod service;

pub use client::{ExternalCertificate, ExternalPosition, ExternalProfile, SyncClient, SyncConfig};
pub use error::SyncError;
pub use service::{HttpInvitationNotifier, PLATFORM, SyncService};
