//! Authentication service — registration, login, session resolution.

use agrinet_core::error::{AgrinetError, AgrinetResult};
use agrinet_core::models::session::CreateSession;
use agrinet_core::models::user::{CreateUser, User};
use agrinet_core::repository::{SessionRepository, UserRepository};
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Successful authentication result (registration and login).
#[derive(Debug)]
pub struct AuthOutput {
    /// Signed JWT access token.
    pub access_token: String,
    /// Raw opaque refresh token (return to client, not stored).
    pub refresh_token: String,
    /// Session ID (can be used for logout).
    pub session_id: Uuid,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
    /// The authenticated user.
    pub user: User,
}

/// Input for the refresh token rotation flow.
#[derive(Debug)]
pub struct RefreshInput {
    pub raw_refresh_token: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Authentication service.
///
/// Generic over repository implementations so that the auth layer
/// has no dependency on the database crate.
pub struct AuthService<U: UserRepository, S: SessionRepository> {
    user_repo: U,
    session_repo: S,
    config: AuthConfig,
}

impl<U: UserRepository, S: SessionRepository> AuthService<U, S> {
    pub fn new(user_repo: U, session_repo: S, config: AuthConfig) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Register a new user and log them in immediately.
    pub async fn register(&self, input: CreateUser) -> AgrinetResult<AuthOutput> {
        if input.password.len() < self.config.min_password_length {
            return Err(AuthError::PasswordTooShort.into());
        }
        if input.email.trim().is_empty() || !input.email.contains('@') {
            return Err(AgrinetError::Validation {
                message: "invalid email address".into(),
            });
        }
        if input.name.trim().is_empty() {
            return Err(AgrinetError::Validation {
                message: "name must not be empty".into(),
            });
        }

        let user = self.user_repo.create(input).await?;
        self.issue_tokens(user, None, None).await
    }

    /// Authenticate a user with email + password and issue tokens.
    pub async fn login(&self, input: LoginInput) -> AgrinetResult<AuthOutput> {
        // Unknown email and wrong password are indistinguishable to
        // the caller.
        let user = self
            .user_repo
            .get_by_email(&input.email)
            .await
            .map_err(|e| match e {
                AgrinetError::NotFound { .. } => AuthError::InvalidCredentials.into(),
                other => other,
            })?;

        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )
        .map_err(|e| AgrinetError::Crypto(e.to_string()))?;

        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        if !user.is_active {
            return Err(AuthError::AccountInactive.into());
        }

        self.issue_tokens(user, input.ip_address, input.user_agent)
            .await
    }

    /// Resolve the current user from a bearer access token.
    ///
    /// Token verification is stateless; the user lookup confirms the
    /// account still exists and is active.
    pub async fn resolve_session(&self, bearer: &str) -> AgrinetResult<User> {
        let claims = token::validate_access_token(bearer, &self.config)?;
        let user_id = claims.0.user_id()?;

        let user = self
            .user_repo
            .get_by_id(user_id)
            .await
            .map_err(|e| match e {
                AgrinetError::NotFound { .. } => AgrinetError::ExpiredOrInvalidToken {
                    reason: "user no longer exists".into(),
                },
                other => other,
            })?;

        if !user.is_active {
            return Err(AgrinetError::ExpiredOrInvalidToken {
                reason: "account is inactive".into(),
            });
        }

        Ok(user)
    }

    /// Rotate a refresh token: consume the old one, verify the user
    /// is still active, and issue a new token pair.
    ///
    /// Each refresh token is single-use — the old session is
    /// invalidated before the new one is created.
    pub async fn refresh(&self, input: RefreshInput) -> AgrinetResult<AuthOutput> {
        let token_hash = token::hash_refresh_token(&input.raw_refresh_token);
        let session = self
            .session_repo
            .get_by_token_hash(&token_hash)
            .await
            .map_err(|e| match e {
                AgrinetError::NotFound { .. } => {
                    AuthError::TokenInvalid("refresh token not found or already used".into())
                        .into()
                }
                other => other,
            })?;

        if session.expires_at <= Utc::now() {
            // Invalidate the expired session and reject.
            let _ = self.session_repo.invalidate(session.id).await;
            return Err(AuthError::TokenExpired.into());
        }

        // Single-use guarantee.
        self.session_repo.invalidate(session.id).await?;

        let user = self.user_repo.get_by_id(session.user_id).await?;
        if !user.is_active {
            return Err(AuthError::AccountInactive.into());
        }

        self.issue_tokens(user, input.ip_address, input.user_agent)
            .await
    }

    /// Invalidate a single session (logout).
    pub async fn logout(&self, session_id: Uuid) -> AgrinetResult<()> {
        self.session_repo.invalidate(session_id).await
    }

    /// Revoke all sessions for a user (e.g. on password change).
    pub async fn revoke_all_sessions(&self, user_id: Uuid) -> AgrinetResult<()> {
        self.session_repo.invalidate_user_sessions(user_id).await
    }

    async fn issue_tokens(
        &self,
        user: User,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> AgrinetResult<AuthOutput> {
        let raw_refresh = token::generate_refresh_token();
        let token_hash = token::hash_refresh_token(&raw_refresh);
        let expires_at =
            Utc::now() + Duration::seconds(self.config.refresh_token_lifetime_secs as i64);

        let session = self
            .session_repo
            .create(CreateSession {
                user_id: user.id,
                token_hash,
                ip_address,
                user_agent,
                expires_at,
            })
            .await?;

        let access_token = token::issue_access_token(user.id, &self.config)?;

        Ok(AuthOutput {
            access_token,
            refresh_token: raw_refresh,
            session_id: session.id,
            expires_in: self.config.access_token_lifetime_secs,
            user,
        })
    }
}
