//! Authentication error types.

use agrinet_core::error::AgrinetError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account is inactive")]
    AccountInactive,

    #[error("password too short")]
    PasswordTooShort,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for AgrinetError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::AccountInactive => {
                AgrinetError::InvalidCredentials
            }
            AuthError::PasswordTooShort => AgrinetError::Validation {
                message: err.to_string(),
            },
            AuthError::TokenExpired | AuthError::TokenInvalid(_) => {
                AgrinetError::ExpiredOrInvalidToken {
                    reason: err.to_string(),
                }
            }
            AuthError::Crypto(msg) => AgrinetError::Crypto(msg),
        }
    }
}
