//! HTTP client for the external professional network API.

use std::time::Duration;

use agrinet_core::error::AgrinetResult;
use agrinet_core::models::validation::ExternalProfileRef;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SyncError;

/// Configuration for the external network client.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// API base URL, e.g. `https://api.linkedin.example`.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.linkedin.example".into(),
            timeout_secs: 10,
        }
    }
}

/// A profile as returned by the external API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalProfile {
    pub id: String,
    pub name: String,
    pub headline: Option<String>,
    pub company: Option<String>,
    pub profile_url: Option<String>,
    #[serde(default)]
    pub positions: Vec<ExternalPosition>,
}

/// A work position on an external profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalPosition {
    pub title: String,
    pub company: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub description: Option<String>,
}

/// A certificate as returned by the external learning API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalCertificate {
    pub id: String,
    pub name: String,
    pub issuing_organization: String,
    pub issue_date: DateTime<Utc>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub verification_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct InvitationPayload<'a> {
    platform_id: &'a str,
    message: String,
}

/// Thin typed wrapper over the external REST API. Every request runs
/// with a bounded timeout; timeouts and 5xx responses surface as
/// `ExternalServiceUnavailable` to callers.
#[derive(Clone)]
pub struct SyncClient {
    http: reqwest::Client,
    base_url: String,
}

impl SyncClient {
    pub fn new(config: SyncConfig) -> Result<Self, SyncError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch a single external profile by its platform id.
    pub async fn fetch_profile(&self, platform_id: &str) -> AgrinetResult<ExternalProfile> {
        let url = format!("{}/v2/people/{platform_id}", self.base_url);
        debug!(%url, "Fetching external profile");

        let response = self.http.get(&url).send().await.map_err(SyncError::from)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(SyncError::ProfileNotFound(platform_id.to_string()).into());
        }
        let response = check_status(response)?;

        let profile = response
            .json::<ExternalProfile>()
            .await
            .map_err(|e| SyncError::MalformedPayload(e.to_string()))?;
        Ok(profile)
    }

    /// Fetch the certificates attached to an external profile.
    pub async fn fetch_certificates(
        &self,
        platform_id: &str,
    ) -> AgrinetResult<Vec<ExternalCertificate>> {
        let url = format!("{}/v2/people/{platform_id}/certifications", self.base_url);
        debug!(%url, "Fetching external certificates");

        let response = self.http.get(&url).send().await.map_err(SyncError::from)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(SyncError::ProfileNotFound(platform_id.to_string()).into());
        }
        let response = check_status(response)?;

        let certificates = response
            .json::<Vec<ExternalCertificate>>()
            .await
            .map_err(|e| SyncError::MalformedPayload(e.to_string()))?;
        Ok(certificates)
    }

    /// Search external profiles by free text.
    pub async fn search_profiles(&self, query: &str) -> AgrinetResult<Vec<ExternalProfile>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let url = format!("{}/v2/people", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(SyncError::from)?;
        let response = check_status(response)?;

        let profiles = response
            .json::<Vec<ExternalProfile>>()
            .await
            .map_err(|e| SyncError::MalformedPayload(e.to_string()))?;
        Ok(profiles)
    }

    /// Send a registration invitation to an external profile.
    pub async fn send_invitation(
        &self,
        subject: &ExternalProfileRef,
        validator_name: &str,
        skill_name: &str,
    ) -> AgrinetResult<()> {
        let url = format!("{}/v2/invitations", self.base_url);
        let payload = InvitationPayload {
            platform_id: &subject.platform_id,
            message: format!(
                "{validator_name} wants to validate your '{skill_name}' work on Agrinet"
            ),
        };

        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(SyncError::from)?;
        check_status(response)?;
        Ok(())
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SyncError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(SyncError::UpstreamStatus {
            status: status.as_u16(),
        })
    }
}
