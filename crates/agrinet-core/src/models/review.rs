//! Peer review domain model.
//!
//! Reviews are star ratings with an optional comment, separate from
//! the validation ledger: they carry no skill claim and no approval
//! lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewed_user_id: Uuid,
    /// Catalog listing the engagement came from, if any.
    pub service_id: Option<Uuid>,
    /// 1 to 5 stars.
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReview {
    pub reviewed_user_id: Uuid,
    pub service_id: Option<Uuid>,
    pub rating: u8,
    pub comment: Option<String>,
}
