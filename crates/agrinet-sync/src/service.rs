//! Sync service — account links, certificate import, experience merge.

use agrinet_core::error::{AgrinetError, AgrinetResult};
use agrinet_core::models::account_link::{AccountLink, CreateAccountLink};
use agrinet_core::models::certificate::{Certificate, ImportCertificate};
use agrinet_core::models::profile::{Experience, ProfileData};
use agrinet_core::models::validation::ExternalProfileRef;
use agrinet_core::repository::{AccountLinkRepository, CertificateRepository, ProfileRepository};
use agrinet_engine::notifier::InvitationNotifier;
use tracing::info;
use uuid::Uuid;

use crate::client::{ExternalPosition, ExternalProfile, SyncClient};
use crate::error::SyncError;

/// The one platform currently wired up.
pub const PLATFORM: &str = "linkedin";

pub struct SyncService<A, C, P>
where
    A: AccountLinkRepository,
    C: CertificateRepository,
    P: ProfileRepository,
{
    client: SyncClient,
    link_repo: A,
    certificate_repo: C,
    profile_repo: P,
}

impl<A, C, P> SyncService<A, C, P>
where
    A: AccountLinkRepository,
    C: CertificateRepository,
    P: ProfileRepository,
{
    pub fn new(client: SyncClient, link_repo: A, certificate_repo: C, profile_repo: P) -> Self {
        Self {
            client,
            link_repo,
            certificate_repo,
            profile_repo,
        }
    }

    /// Link the user's external account, snapshotting display fields
    /// from the live profile. Reconnecting replaces the snapshot.
    pub async fn connect(&self, user_id: Uuid, platform_id: &str) -> AgrinetResult<AccountLink> {
        let profile = self.client.fetch_profile(platform_id).await?;

        let link = self
            .link_repo
            .connect(CreateAccountLink {
                user_id,
                platform: PLATFORM.into(),
                platform_id: platform_id.to_string(),
                display_name: Some(profile.name),
                profile_url: profile.profile_url,
            })
            .await?;

        info!(user_id = %user_id, platform_id, "External account linked");
        Ok(link)
    }

    pub async fn get_link(&self, user_id: Uuid) -> AgrinetResult<Option<AccountLink>> {
        self.link_repo.get(user_id, PLATFORM).await
    }

    /// Idempotent: disconnecting an absent link is a no-op.
    pub async fn disconnect(&self, user_id: Uuid) -> AgrinetResult<()> {
        self.link_repo.disconnect(user_id, PLATFORM).await?;
        info!(user_id = %user_id, "External account disconnected");
        Ok(())
    }

    /// Pull certificates from the external platform and import the
    /// ones not seen before. Returns only newly imported records;
    /// re-importing the same set adds nothing.
    pub async fn import_certificates(&self, user_id: Uuid) -> AgrinetResult<Vec<Certificate>> {
        let link = self.require_link(user_id).await?;
        let external = self.client.fetch_certificates(&link.platform_id).await?;

        let mut imported = Vec::new();
        for cert in external {
            let result = self
                .certificate_repo
                .import(ImportCertificate {
                    user_id,
                    external_id: cert.id,
                    name: cert.name,
                    issuing_organization: cert.issuing_organization,
                    issue_date: cert.issue_date,
                    expiry_date: cert.expiry_date,
                    verification_url: cert.verification_url,
                })
                .await?;
            if let Some(certificate) = result {
                imported.push(certificate);
            }
        }

        info!(
            user_id = %user_id,
            imported = imported.len(),
            "Certificate import finished"
        );
        Ok(imported)
    }

    /// Merge external positions into the profile's experience,
    /// deduplicated by (company, position, start date). The profile
    /// must already exist.
    pub async fn sync_experience(&self, user_id: Uuid) -> AgrinetResult<usize> {
        let link = self.require_link(user_id).await?;
        let external = self.client.fetch_profile(&link.platform_id).await?;

        let profile = self.profile_repo.get_by_user(user_id).await?;
        let mut experience = profile.experience.clone();
        let mut added = 0;

        for position in external.positions {
            if experience.iter().any(|e| same_position(e, &position)) {
                continue;
            }
            experience.push(Experience {
                id: Uuid::new_v4(),
                position: position.title,
                company: position.company,
                start_date: position.start_date,
                end_date: position.end_date,
                still_active: position.end_date.is_none(),
                description: position.description,
                location: position.location,
            });
            added += 1;
        }

        if added > 0 {
            self.profile_repo
                .upsert(
                    user_id,
                    ProfileData {
                        profile_type: profile.profile_type,
                        title: profile.title,
                        bio: profile.bio,
                        phone: profile.phone,
                        website: profile.website,
                        address: profile.address,
                        skills: profile.skills,
                        experience,
                    },
                )
                .await?;
        }

        info!(user_id = %user_id, added, "Experience sync finished");
        Ok(added)
    }

    /// Proxy an external profile search.
    pub async fn search_external_profiles(
        &self,
        query: &str,
    ) -> AgrinetResult<Vec<ExternalProfile>> {
        self.client.search_profiles(query).await
    }

    async fn require_link(&self, user_id: Uuid) -> AgrinetResult<AccountLink> {
        self.link_repo
            .get(user_id, PLATFORM)
            .await?
            .ok_or_else(|| {
                AgrinetError::from(SyncError::NotLinked {
                    platform: PLATFORM.into(),
                })
            })
    }
}

fn same_position(existing: &Experience, incoming: &ExternalPosition) -> bool {
    existing.company.eq_ignore_ascii_case(&incoming.company)
        && existing.position.eq_ignore_ascii_case(&incoming.title)
        && existing.start_date == incoming.start_date
}

/// Invitation delivery over the external network API.
#[derive(Clone)]
pub struct HttpInvitationNotifier {
    client: SyncClient,
}

impl HttpInvitationNotifier {
    pub fn new(client: SyncClient) -> Self {
        Self { client }
    }
}

impl InvitationNotifier for HttpInvitationNotifier {
    async fn invite(
        &self,
        subject: &ExternalProfileRef,
        validator_name: &str,
        skill_name: &str,
    ) -> AgrinetResult<()> {
        self.client
            .send_invitation(subject, validator_name, skill_name)
            .await
    }
}
