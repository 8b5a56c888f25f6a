//! External account link domain model.
//!
//! One row per (user, platform) connection to an external
//! professional network; the sync adapter reads through it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountLink {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Platform identifier, e.g. `linkedin`.
    pub platform: String,
    /// The user's id on the external platform.
    pub platform_id: String,
    pub display_name: Option<String>,
    pub profile_url: Option<String>,
    pub connected_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountLink {
    pub user_id: Uuid,
    pub platform: String,
    pub platform_id: String,
    pub display_name: Option<String>,
    pub profile_url: Option<String>,
}
