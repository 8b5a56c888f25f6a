//! Imported certificate domain model.
//!
//! Certificates are pulled from an external learning platform and
//! deduplicated by their external id, so re-imports are no-ops.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certificate {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Id assigned by the issuing platform; unique per user.
    pub external_id: String,
    pub name: String,
    pub issuing_organization: String,
    pub issue_date: DateTime<Utc>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub verification_url: Option<String>,
    pub imported_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportCertificate {
    pub user_id: Uuid,
    pub external_id: String,
    pub name: String,
    pub issuing_organization: String,
    pub issue_date: DateTime<Utc>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub verification_url: Option<String>,
}
