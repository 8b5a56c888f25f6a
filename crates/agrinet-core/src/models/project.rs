//! Collaborative project domain model.
//!
//! Projects give validations verifiable collaboration context. The
//! collaborator set is mutable by the creator only until a validation
//! references the project; after that it is frozen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    Irrigation,
    CropManagement,
    Livestock,
    TechnologyImplementation,
    SoilImprovement,
    PestControl,
    HarvestOptimization,
    EquipmentInstallation,
    Other,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Irrigation => "irrigation",
            ProjectType::CropManagement => "crop_management",
            ProjectType::Livestock => "livestock",
            ProjectType::TechnologyImplementation => "technology_implementation",
            ProjectType::SoilImprovement => "soil_improvement",
            ProjectType::PestControl => "pest_control",
            ProjectType::HarvestOptimization => "harvest_optimization",
            ProjectType::EquipmentInstallation => "equipment_installation",
            ProjectType::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "irrigation" => Some(ProjectType::Irrigation),
            "crop_management" => Some(ProjectType::CropManagement),
            "livestock" => Some(ProjectType::Livestock),
            "technology_implementation" => Some(ProjectType::TechnologyImplementation),
            "soil_improvement" => Some(ProjectType::SoilImprovement),
            "pest_control" => Some(ProjectType::PestControl),
            "harvest_optimization" => Some(ProjectType::HarvestOptimization),
            "equipment_installation" => Some(ProjectType::EquipmentInstallation),
            "other" => Some(ProjectType::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub name: String,
    pub project_type: ProjectType,
    pub location: Option<String>,
    pub start_date: DateTime<Utc>,
    /// Absent iff `still_active`.
    pub end_date: Option<DateTime<Utc>>,
    pub still_active: bool,
    pub description: Option<String>,
    /// Free-text outcome narrative.
    pub results: Option<String>,
    pub skills_demonstrated: Vec<String>,
    /// Always contains `creator_id`.
    pub collaborators: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn is_collaborator(&self, user_id: Uuid) -> bool {
        self.collaborators.contains(&user_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub project_type: ProjectType,
    pub location: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub still_active: bool,
    pub description: Option<String>,
    pub results: Option<String>,
    #[serde(default)]
    pub skills_demonstrated: Vec<String>,
    /// Collaborators beyond the creator (who is added implicitly).
    #[serde(default)]
    pub collaborators: Vec<Uuid>,
}
