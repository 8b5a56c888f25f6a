//! Taggable entity domain model.
//!
//! Entities are real-world objects (people, companies, products,
//! locations, crops) referenced — never owned — by validations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Person,
    Company,
    Product,
    Location,
    Crop,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Person => "person",
            EntityKind::Company => "company",
            EntityKind::Product => "product",
            EntityKind::Location => "location",
            EntityKind::Crop => "crop",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "person" => Some(EntityKind::Person),
            "company" => Some(EntityKind::Company),
            "product" => Some(EntityKind::Product),
            "location" => Some(EntityKind::Location),
            "crop" => Some(EntityKind::Crop),
            _ => None,
        }
    }
}

/// Kind-specific descriptive fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "entity_type", rename_all = "snake_case")]
pub enum EntityDetails {
    Person {
        title: Option<String>,
        company: Option<String>,
        platform: Option<String>,
    },
    Company {
        industry: Option<String>,
    },
    Product {
        category: Option<String>,
        brand: Option<String>,
        model: Option<String>,
    },
    Location {
        address: Option<String>,
    },
    Crop {
        variety: Option<String>,
        season: Option<String>,
    },
}

impl EntityDetails {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityDetails::Person { .. } => EntityKind::Person,
            EntityDetails::Company { .. } => EntityKind::Company,
            EntityDetails::Product { .. } => EntityKind::Product,
            EntityDetails::Location { .. } => EntityKind::Location,
            EntityDetails::Crop { .. } => EntityKind::Crop,
        }
    }

    /// Descriptive text fields, used for substring search alongside
    /// the entity name.
    pub fn searchable_fields(&self) -> Vec<&str> {
        fn opt(o: &Option<String>) -> Option<&str> {
            o.as_deref()
        }
        match self {
            EntityDetails::Person {
                title,
                company,
                platform,
            } => [opt(title), opt(company), opt(platform)]
                .into_iter()
                .flatten()
                .collect(),
            EntityDetails::Company { industry } => opt(industry).into_iter().collect(),
            EntityDetails::Product {
                category,
                brand,
                model,
            } => [opt(category), opt(brand), opt(model)]
                .into_iter()
                .flatten()
                .collect(),
            EntityDetails::Location { address } => opt(address).into_iter().collect(),
            EntityDetails::Crop { variety, season } => [opt(variety), opt(season)]
                .into_iter()
                .flatten()
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: Uuid,
    pub name: String,
    #[serde(flatten)]
    pub details: EntityDetails,
    pub created_at: DateTime<Utc>,
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        self.details.kind()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEntity {
    pub name: String,
    #[serde(flatten)]
    pub details: EntityDetails,
}

/// An entity reference as supplied when tagging a validation: either
/// an existing entity by id, or an inline description that is created
/// on first use (deduplicated case-insensitively on kind + name).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityTag {
    Existing { entity_id: Uuid },
    Inline(CreateEntity),
}
