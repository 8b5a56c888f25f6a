//! Marketplace service listing domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Consultation,
    EquipmentRental,
    Veterinary,
    AgronomicAdvice,
    CropProtection,
    SoilAnalysis,
    Irrigation,
    Harvesting,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Consultation => "consultation",
            ServiceType::EquipmentRental => "equipment_rental",
            ServiceType::Veterinary => "veterinary",
            ServiceType::AgronomicAdvice => "agronomic_advice",
            ServiceType::CropProtection => "crop_protection",
            ServiceType::SoilAnalysis => "soil_analysis",
            ServiceType::Irrigation => "irrigation",
            ServiceType::Harvesting => "harvesting",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "consultation" => Some(ServiceType::Consultation),
            "equipment_rental" => Some(ServiceType::EquipmentRental),
            "veterinary" => Some(ServiceType::Veterinary),
            "agronomic_advice" => Some(ServiceType::AgronomicAdvice),
            "crop_protection" => Some(ServiceType::CropProtection),
            "soil_analysis" => Some(ServiceType::SoilAnalysis),
            "irrigation" => Some(ServiceType::Irrigation),
            "harvesting" => Some(ServiceType::Harvesting),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Entry,
    Intermediate,
    Advanced,
    Expert,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Advanced => "advanced",
            ExperienceLevel::Expert => "expert",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "entry" => Some(ExperienceLevel::Entry),
            "intermediate" => Some(ExperienceLevel::Intermediate),
            "advanced" => Some(ExperienceLevel::Advanced),
            "expert" => Some(ExperienceLevel::Expert),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub title: String,
    pub description: String,
    pub service_type: ServiceType,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub currency: String,
    pub location: Option<String>,
    pub experience_level: ExperienceLevel,
    pub skills_required: Vec<String>,
    pub availability: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateService {
    pub title: String,
    pub description: String,
    pub service_type: ServiceType,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub location: Option<String>,
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub skills_required: Vec<String>,
    pub availability: Option<String>,
}
