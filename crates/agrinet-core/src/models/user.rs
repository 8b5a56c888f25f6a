//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Professional role a user registers under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Farmer,
    Consultant,
    EquipmentDealer,
    Veterinarian,
    Agronomist,
    Supplier,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Farmer => "farmer",
            UserRole::Consultant => "consultant",
            UserRole::EquipmentDealer => "equipment_dealer",
            UserRole::Veterinarian => "veterinarian",
            UserRole::Agronomist => "agronomist",
            UserRole::Supplier => "supplier",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "farmer" => Some(UserRole::Farmer),
            "consultant" => Some(UserRole::Consultant),
            "equipment_dealer" => Some(UserRole::EquipmentDealer),
            "veterinarian" => Some(UserRole::Veterinarian),
            "agronomist" => Some(UserRole::Agronomist),
            "supplier" => Some(UserRole::Supplier),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub profile_completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub name: String,
    pub role: UserRole,
    /// Raw password (hashed with Argon2id before storage).
    pub password: String,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
    pub profile_completed: Option<bool>,
}
