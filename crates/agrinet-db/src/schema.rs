//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD name ON TABLE user TYPE string;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['farmer', 'consultant', 'equipment_dealer', \
    'veterinarian', 'agronomist', 'supplier'];
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD is_active ON TABLE user TYPE bool DEFAULT true;
DEFINE FIELD profile_completed ON TABLE user TYPE bool DEFAULT false;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;

-- =======================================================================
-- Sessions (refresh tokens)
-- =======================================================================
DEFINE TABLE session SCHEMAFULL;
DEFINE FIELD user_id ON TABLE session TYPE string;
DEFINE FIELD token_hash ON TABLE session TYPE string;
DEFINE FIELD ip_address ON TABLE session TYPE option<string>;
DEFINE FIELD user_agent ON TABLE session TYPE option<string>;
DEFINE FIELD expires_at ON TABLE session TYPE datetime;
DEFINE FIELD created_at ON TABLE session TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_session_token_hash ON TABLE session \
    COLUMNS token_hash UNIQUE;

-- =======================================================================
-- Profiles (one per user)
-- =======================================================================
DEFINE TABLE profile SCHEMAFULL;
DEFINE FIELD user_id ON TABLE profile TYPE string;
DEFINE FIELD profile_type ON TABLE profile TYPE string \
    ASSERT $value IN ['individual', 'business', 'organization'];
DEFINE FIELD title ON TABLE profile TYPE string;
DEFINE FIELD bio ON TABLE profile TYPE option<string>;
DEFINE FIELD phone ON TABLE profile TYPE option<string>;
DEFINE FIELD website ON TABLE profile TYPE option<string>;
DEFINE FIELD address ON TABLE profile TYPE option<object> FLEXIBLE;
DEFINE FIELD skills ON TABLE profile TYPE array<object> FLEXIBLE DEFAULT [];
DEFINE FIELD experience ON TABLE profile TYPE array<object> FLEXIBLE DEFAULT [];
DEFINE FIELD created_at ON TABLE profile TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE profile TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_profile_user ON TABLE profile COLUMNS user_id UNIQUE;

-- =======================================================================
-- Entities (taggable catalog)
-- =======================================================================
DEFINE TABLE entity SCHEMAFULL;
DEFINE FIELD name ON TABLE entity TYPE string;
DEFINE FIELD kind ON TABLE entity TYPE string \
    ASSERT $value IN ['person', 'company', 'product', 'location', \
    'crop'];
DEFINE FIELD details ON TABLE entity TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD search_text ON TABLE entity TYPE string;
DEFINE FIELD created_at ON TABLE entity TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_entity_kind_name ON TABLE entity \
    COLUMNS kind, name UNIQUE;

-- =======================================================================
-- Projects
-- =======================================================================
DEFINE TABLE project SCHEMAFULL;
DEFINE FIELD creator_id ON TABLE project TYPE string;
DEFINE FIELD name ON TABLE project TYPE string;
DEFINE FIELD project_type ON TABLE project TYPE string \
    ASSERT $value IN ['irrigation', 'crop_management', 'livestock', \
    'technology_implementation', 'soil_improvement', 'pest_control', \
    'harvest_optimization', 'equipment_installation', 'other'];
DEFINE FIELD location ON TABLE project TYPE option<string>;
DEFINE FIELD start_date ON TABLE project TYPE datetime;
DEFINE FIELD end_date ON TABLE project TYPE option<datetime>;
DEFINE FIELD still_active ON TABLE project TYPE bool DEFAULT false;
DEFINE FIELD description ON TABLE project TYPE option<string>;
DEFINE FIELD results ON TABLE project TYPE option<string>;
DEFINE FIELD skills_demonstrated ON TABLE project TYPE array<string> \
    DEFAULT [];
DEFINE FIELD collaborators ON TABLE project TYPE array<string> \
    DEFAULT [];
DEFINE FIELD created_at ON TABLE project TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Validations (append-only attestation ledger)
-- =======================================================================
DEFINE TABLE validation SCHEMAFULL;
DEFINE FIELD validator_id ON TABLE validation TYPE string;
DEFINE FIELD subject_kind ON TABLE validation TYPE string \
    ASSERT $value IN ['internal', 'external'];
DEFINE FIELD subject_user_id ON TABLE validation TYPE option<string>;
DEFINE FIELD subject_platform ON TABLE validation TYPE option<string>;
DEFINE FIELD subject_platform_id ON TABLE validation \
    TYPE option<string>;
DEFINE FIELD subject_name ON TABLE validation TYPE option<string>;
DEFINE FIELD subject_title ON TABLE validation TYPE option<string>;
DEFINE FIELD subject_company ON TABLE validation TYPE option<string>;
DEFINE FIELD skill_id ON TABLE validation TYPE string;
DEFINE FIELD skill_name ON TABLE validation TYPE string;
DEFINE FIELD description ON TABLE validation TYPE string;
DEFINE FIELD project_id ON TABLE validation TYPE option<string>;
DEFINE FIELD tagged_entities ON TABLE validation TYPE array<string> \
    DEFAULT [];
DEFINE FIELD quantified_results ON TABLE validation \
    TYPE option<string>;
DEFINE FIELD impact_metrics ON TABLE validation TYPE array<string> \
    DEFAULT [];
DEFINE FIELD working_relationship ON TABLE validation \
    TYPE option<string>;
DEFINE FIELD collaboration_period ON TABLE validation \
    TYPE option<string>;
DEFINE FIELD status ON TABLE validation TYPE string \
    ASSERT $value IN ['pending', 'approved', 'rejected'];
DEFINE FIELD created_at ON TABLE validation TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE validation TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_validation_project ON TABLE validation \
    COLUMNS project_id;
DEFINE INDEX idx_validation_subject_user ON TABLE validation \
    COLUMNS subject_user_id;

-- =======================================================================
-- Services (marketplace listings)
-- =======================================================================
DEFINE TABLE service SCHEMAFULL;
DEFINE FIELD provider_id ON TABLE service TYPE string;
DEFINE FIELD title ON TABLE service TYPE string;
DEFINE FIELD description ON TABLE service TYPE string;
DEFINE FIELD service_type ON TABLE service TYPE string \
    ASSERT $value IN ['consultation', 'equipment_rental', \
    'veterinary', 'agronomic_advice', 'crop_protection', \
    'soil_analysis', 'irrigation', 'harvesting'];
DEFINE FIELD price_min ON TABLE service TYPE option<float>;
DEFINE FIELD price_max ON TABLE service TYPE option<float>;
DEFINE FIELD currency ON TABLE service TYPE string DEFAULT 'USD';
DEFINE FIELD location ON TABLE service TYPE option<string>;
DEFINE FIELD experience_level ON TABLE service TYPE string \
    ASSERT $value IN ['entry', 'intermediate', 'advanced', 'expert'];
DEFINE FIELD skills_required ON TABLE service TYPE array<string> \
    DEFAULT [];
DEFINE FIELD availability ON TABLE service TYPE option<string>;
DEFINE FIELD active ON TABLE service TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE service TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Reviews (star ratings between users)
-- =======================================================================
DEFINE TABLE review SCHEMAFULL;
DEFINE FIELD reviewer_id ON TABLE review TYPE string;
DEFINE FIELD reviewed_user_id ON TABLE review TYPE string;
DEFINE FIELD service_id ON TABLE review TYPE option<string>;
DEFINE FIELD rating ON TABLE review TYPE int \
    ASSERT $value >= 1 AND $value <= 5;
DEFINE FIELD comment ON TABLE review TYPE option<string>;
DEFINE FIELD created_at ON TABLE review TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_review_reviewed_user ON TABLE review \
    COLUMNS reviewed_user_id;

-- =======================================================================
-- Imported certificates
-- =======================================================================
DEFINE TABLE certificate SCHEMAFULL;
DEFINE FIELD user_id ON TABLE certificate TYPE string;
DEFINE FIELD external_id ON TABLE certificate TYPE string;
DEFINE FIELD name ON TABLE certificate TYPE string;
DEFINE FIELD issuing_organization ON TABLE certificate TYPE string;
DEFINE FIELD issue_date ON TABLE certificate TYPE datetime;
DEFINE FIELD expiry_date ON TABLE certificate TYPE option<datetime>;
DEFINE FIELD verification_url ON TABLE certificate \
    TYPE option<string>;
DEFINE FIELD imported_at ON TABLE certificate TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_certificate_user_external ON TABLE certificate \
    COLUMNS user_id, external_id UNIQUE;

-- =======================================================================
-- External account links
-- =======================================================================
DEFINE TABLE account_link SCHEMAFULL;
DEFINE FIELD user_id ON TABLE account_link TYPE string;
DEFINE FIELD platform ON TABLE account_link TYPE string;
DEFINE FIELD platform_id ON TABLE account_link TYPE string;
DEFINE FIELD display_name ON TABLE account_link TYPE option<string>;
DEFINE FIELD profile_url ON TABLE account_link TYPE option<string>;
DEFINE FIELD connected_at ON TABLE account_link TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_account_link_user_platform ON TABLE account_link \
    COLUMNS user_id, platform UNIQUE;
";

/// Run all pending migrations, recording each applied version.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
