//! Database-specific error types and conversions.

use agrinet_core::error::AgrinetError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Malformed row: {0}")]
    Corrupt(String),
}

impl From<DbError> for AgrinetError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AgrinetError::NotFound { entity, id },
            other => AgrinetError::Database(other.to_string()),
        }
    }
}
