//! Invitation delivery abstraction.

use agrinet_core::error::AgrinetResult;
use agrinet_core::models::validation::ExternalProfileRef;

/// Delivers an invitation to an external validation subject, asking
/// them to register and claim the validation.
///
/// Delivery is best-effort: callers log failures and carry on, the
/// validation itself is never rolled back.
pub trait InvitationNotifier: Send + Sync {
    fn invite(
        &self,
        subject: &ExternalProfileRef,
        validator_name: &str,
        skill_name: &str,
    ) -> impl Future<Output = AgrinetResult<()>> + Send;
}

/// Notifier that silently drops invitations. Used in tests and in
/// deployments without an outbound channel configured.
#[derive(Debug, Clone, Default)]
pub struct NoopInvitationNotifier;

impl InvitationNotifier for NoopInvitationNotifier {
    async fn invite(
        &self,
        _subject: &ExternalProfileRef,
        _validator_name: &str,
        _skill_name: &str,
    ) -> AgrinetResult<()> {
        Ok(())
    }
}
