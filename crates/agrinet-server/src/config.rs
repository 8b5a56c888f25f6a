//! Environment-driven server configuration.

use agrinet_auth::AuthConfig;
use agrinet_core::error::AgrinetError;
use agrinet_db::DbConfig;
use agrinet_sync::SyncConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address the HTTP server binds to.
    pub bind_addr: String,
    pub db: DbConfig,
    pub auth: AuthConfig,
    pub sync: SyncConfig,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn require_env(key: &str) -> Result<String, AgrinetError> {
    std::env::var(key)
        .map_err(|_| AgrinetError::Internal(format!("missing required env var {key}")))
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AgrinetError> {
        let db = DbConfig {
            url: env_or("AGRINET_DB_URL", "127.0.0.1:8000"),
            namespace: env_or("AGRINET_DB_NS", "agrinet"),
            database: env_or("AGRINET_DB_NAME", "main"),
            username: env_or("AGRINET_DB_USER", "root"),
            password: env_or("AGRINET_DB_PASS", "root"),
        };

        let auth = AuthConfig {
            jwt_private_key_pem: require_env("AGRINET_JWT_PRIVATE_KEY_PEM")?,
            jwt_public_key_pem: require_env("AGRINET_JWT_PUBLIC_KEY_PEM")?,
            jwt_issuer: env_or("AGRINET_JWT_ISSUER", "agrinet"),
            pepper: std::env::var("AGRINET_PASSWORD_PEPPER").ok(),
            ..AuthConfig::default()
        };

        let sync = SyncConfig {
            base_url: env_or("AGRINET_SYNC_BASE_URL", &SyncConfig::default().base_url),
            timeout_secs: env_or("AGRINET_SYNC_TIMEOUT_SECS", "10")
                .parse()
                .map_err(|e| {
                    AgrinetError::Internal(format!("invalid AGRINET_SYNC_TIMEOUT_SECS: {e}"))
                })?,
        };

        Ok(Self {
            bind_addr: env_or("AGRINET_BIND", "0.0.0.0:8080"),
            db,
            auth,
            sync,
        })
    }
}
