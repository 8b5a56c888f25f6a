//! Professional profile domain model.
//!
//! A profile is one-to-one with a user and owns its skill and
//! experience collections. Upserts replace those collections
//! wholesale — the client always sends the full current set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::certificate::Certificate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProfileType {
    Individual,
    Business,
    Organization,
}

impl ProfileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileType::Individual => "individual",
            ProfileType::Business => "business",
            ProfileType::Organization => "organization",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "individual" => Some(ProfileType::Individual),
            "business" => Some(ProfileType::Business),
            "organization" => Some(ProfileType::Organization),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub street: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    /// Set once at least one approved validation names this skill.
    pub verified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub id: Uuid,
    pub position: String,
    pub company: String,
    pub start_date: DateTime<Utc>,
    /// Absent iff `still_active`.
    pub end_date: Option<DateTime<Utc>>,
    pub still_active: bool,
    pub description: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub profile_type: ProfileType,
    pub title: String,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<Address>,
    pub skills: Vec<Skill>,
    pub experience: Vec<Experience>,
    pub certifications: Vec<Certificate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable profile fields, as sent by the owner on every save.
///
/// `skills` and `experience` are the complete desired collections,
/// not deltas: an empty list empties the stored collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileData {
    pub profile_type: ProfileType,
    pub title: String,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<Address>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub experience: Vec<Experience>,
}
