//! Validation domain model — the core peer attestation record.
//!
//! A validation always has exactly one validator and exactly one
//! subject (an internal user or an external profile snapshot), and is
//! never deleted: it only moves pending → approved | rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::entity::EntityTag;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Pending => "pending",
            ValidationStatus::Approved => "approved",
            ValidationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ValidationStatus::Pending),
            "approved" => Some(ValidationStatus::Approved),
            "rejected" => Some(ValidationStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ValidationStatus::Pending)
    }
}

/// Snapshot of a profile on an external network, used as a validation
/// subject until a registered user claims it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExternalProfileRef {
    pub platform: String,
    pub platform_id: String,
    pub name: String,
    pub title: Option<String>,
    pub company: Option<String>,
}

/// The party being validated — exactly one of the two kinds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ValidationSubject {
    /// Registered user, actionable immediately.
    Internal { user_id: Uuid },
    /// External snapshot; actionable only after being claimed.
    External(ExternalProfileRef),
}

impl ValidationSubject {
    pub fn internal_user_id(&self) -> Option<Uuid> {
        match self {
            ValidationSubject::Internal { user_id } => Some(*user_id),
            ValidationSubject::External(_) => None,
        }
    }
}

/// Quantifiable outcome categories a validation can be tagged with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImpactMetric {
    WaterSavings,
    CostReduction,
    YieldIncrease,
    EfficiencyImprovement,
    QualityEnhancement,
    TimeSavings,
    EnvironmentalBenefit,
}

impl ImpactMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactMetric::WaterSavings => "water_savings",
            ImpactMetric::CostReduction => "cost_reduction",
            ImpactMetric::YieldIncrease => "yield_increase",
            ImpactMetric::EfficiencyImprovement => "efficiency_improvement",
            ImpactMetric::QualityEnhancement => "quality_enhancement",
            ImpactMetric::TimeSavings => "time_savings",
            ImpactMetric::EnvironmentalBenefit => "environmental_benefit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "water_savings" => Some(ImpactMetric::WaterSavings),
            "cost_reduction" => Some(ImpactMetric::CostReduction),
            "yield_increase" => Some(ImpactMetric::YieldIncrease),
            "efficiency_improvement" => Some(ImpactMetric::EfficiencyImprovement),
            "quality_enhancement" => Some(ImpactMetric::QualityEnhancement),
            "time_savings" => Some(ImpactMetric::TimeSavings),
            "environmental_benefit" => Some(ImpactMetric::EnvironmentalBenefit),
            _ => None,
        }
    }
}

/// How the validator worked with the subject.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkingRelationship {
    DirectSupervisor,
    Colleague,
    Client,
    TeamMember,
    Contractor,
}

impl WorkingRelationship {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkingRelationship::DirectSupervisor => "direct_supervisor",
            WorkingRelationship::Colleague => "colleague",
            WorkingRelationship::Client => "client",
            WorkingRelationship::TeamMember => "team_member",
            WorkingRelationship::Contractor => "contractor",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "direct_supervisor" => Some(WorkingRelationship::DirectSupervisor),
            "colleague" => Some(WorkingRelationship::Colleague),
            "client" => Some(WorkingRelationship::Client),
            "team_member" => Some(WorkingRelationship::TeamMember),
            "contractor" => Some(WorkingRelationship::Contractor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Validation {
    pub id: Uuid,
    pub validator_id: Uuid,
    pub subject: ValidationSubject,
    pub skill_id: Uuid,
    pub skill_name: String,
    pub description: String,
    pub project_id: Option<Uuid>,
    pub tagged_entities: Vec<Uuid>,
    pub quantified_results: Option<String>,
    pub impact_metrics: Vec<ImpactMetric>,
    pub working_relationship: Option<WorkingRelationship>,
    pub collaboration_period: Option<String>,
    pub status: ValidationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a validation. The validator id comes from the
/// resolved session, never from the payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateValidation {
    pub subject: ValidationSubject,
    pub skill_id: Uuid,
    pub skill_name: String,
    pub description: String,
    pub project_id: Option<Uuid>,
    #[serde(default)]
    pub tagged_entities: Vec<EntityTag>,
    pub quantified_results: Option<String>,
    #[serde(default)]
    pub impact_metrics: Vec<ImpactMetric>,
    pub working_relationship: Option<WorkingRelationship>,
    pub collaboration_period: Option<String>,
}
