//! Error types for the Agrinet system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgrinetError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired or invalid: {reason}")]
    ExpiredOrInvalidToken { reason: String },

    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    #[error("Invalid state: {reason}")]
    InvalidState { reason: String },

    #[error("Invalid validation subject: {reason}")]
    InvalidSubject { reason: String },

    #[error("Invalid date range: {reason}")]
    InvalidDateRange { reason: String },

    #[error("Invalid range: {reason}")]
    InvalidRange { reason: String },

    #[error("User {user_id} is not a collaborator on project {project_id}")]
    NotACollaborator { user_id: String, project_id: String },

    #[error("External service unavailable: {service}: {reason}")]
    ExternalServiceUnavailable { service: String, reason: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AgrinetResult<T> = Result<T, AgrinetError>;
