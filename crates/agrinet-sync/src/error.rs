//! Sync adapter error types.

use agrinet_core::error::AgrinetError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("platform '{platform}' is not linked for this user")]
    NotLinked { platform: String },

    #[error("external profile not found: {0}")]
    ProfileNotFound(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned {status}")]
    UpstreamStatus { status: u16 },

    #[error("malformed upstream payload: {0}")]
    MalformedPayload(String),
}

impl From<SyncError> for AgrinetError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::NotLinked { platform } => AgrinetError::NotFound {
                entity: "account_link".into(),
                id: platform,
            },
            SyncError::ProfileNotFound(id) => AgrinetError::NotFound {
                entity: "external_profile".into(),
                id,
            },
            SyncError::Transport(e) => AgrinetError::ExternalServiceUnavailable {
                service: "linkedin".into(),
                reason: e.to_string(),
            },
            SyncError::UpstreamStatus { status } => AgrinetError::ExternalServiceUnavailable {
                service: "linkedin".into(),
                reason: format!("upstream status {status}"),
            },
            SyncError::MalformedPayload(msg) => AgrinetError::ExternalServiceUnavailable {
                service: "linkedin".into(),
                reason: msg,
            },
        }
    }
}
