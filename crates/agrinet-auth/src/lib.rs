//! Agrinet Auth — password authentication and JWT
//! issuance/validation.

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthOutput, AuthService, LoginInput, RefreshInput};
pub use token::AccessTokenClaims;
