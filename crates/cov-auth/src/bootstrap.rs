//! Organization auto-activation at session start.
//!
//! A single-shot state machine, `Waiting → Resolved`, that runs once per
//! session load. Its only job is to make sure a signed-in user who has no
//! active organization gets one activated before the rest of the
//! application starts issuing scoped requests.
//!
//! Errors here are deliberately downgraded to warnings: a failed membership
//! fetch or activation must not hang the application. "No active
//! organization" is a normal state downstream screens handle.

use std::future::Future;

use crate::error::AuthError;

/// Bootstrap progress.
///
/// ```text
/// waiting → resolved
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    /// The identity SDK has not finished loading.
    Waiting,
    /// Auth is ready; an organization may or may not be active.
    Resolved,
}

/// Minimal view of a membership, as needed for activation.
#[derive(Debug, Clone)]
pub struct MembershipSummary {
    pub organization_id: String,
    /// Raw Clerk role string; not consulted during activation.
    pub role: String,
}

/// The slice of the identity provider's session object the bootstrap needs.
///
/// Implemented by `session::ClerkSession` in production and by fakes in tests.
pub trait IdentitySession {
    fn is_loaded(&self) -> bool;
    fn user_id(&self) -> Option<&str>;
    fn active_organization(&self) -> Option<&str>;
    fn organization_memberships(
        &self,
    ) -> impl Future<Output = Result<Vec<MembershipSummary>, AuthError>> + Send;
    fn set_active_organization(
        &mut self,
        organization_id: &str,
    ) -> impl Future<Output = Result<(), AuthError>> + Send;
}

/// Single-shot organization auto-activation.
#[derive(Debug)]
pub struct OrgBootstrap {
    state: BootstrapState,
    activated: Option<String>,
}

impl Default for OrgBootstrap {
    fn default() -> Self {
        Self::new()
    }
}

impl OrgBootstrap {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: BootstrapState::Waiting,
            activated: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> BootstrapState {
        self.state
    }

    /// Organization activated by this bootstrap, if any.
    #[must_use]
    pub fn activated(&self) -> Option<&str> {
        self.activated.as_deref()
    }

    /// Advance the state machine. Call again whenever the session's loading
    /// state may have changed; once `Resolved`, further calls are no-ops —
    /// the bootstrap does not re-run on later membership changes within the
    /// same session.
    pub async fn tick(&mut self, session: &mut impl IdentitySession) -> BootstrapState {
        if self.state == BootstrapState::Resolved {
            return self.state;
        }
        if !session.is_loaded() {
            return BootstrapState::Waiting;
        }

        if session.user_id().is_none() || session.active_organization().is_some() {
            self.state = BootstrapState::Resolved;
            return self.state;
        }

        match session.organization_memberships().await {
            Ok(memberships) => {
                // First membership in provider order. No tie-break policy
                // exists for users in several organizations; see DESIGN.md.
                if let Some(first) = memberships.first() {
                    match session.set_active_organization(&first.organization_id).await {
                        Ok(()) => {
                            tracing::info!(
                                organization_id = %first.organization_id,
                                "auto-activated organization at session start"
                            );
                            self.activated = Some(first.organization_id.clone());
                        }
                        Err(error) => {
                            tracing::warn!(
                                organization_id = %first.organization_id,
                                %error,
                                "organization activation failed; continuing without an active organization"
                            );
                        }
                    }
                }
            }
            Err(error) => {
                tracing::warn!(
                    %error,
                    "membership fetch failed during session bootstrap; continuing without an active organization"
                );
            }
        }

        self.state = BootstrapState::Resolved;
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct FakeSession {
        loaded: bool,
        user_id: Option<String>,
        active: Option<String>,
        memberships: Result<Vec<MembershipSummary>, String>,
        activation_fails: bool,
    }

    impl FakeSession {
        fn signed_in(memberships: Vec<MembershipSummary>) -> Self {
            Self {
                loaded: true,
                user_id: Some("user_1".into()),
                active: None,
                memberships: Ok(memberships),
                activation_fails: false,
            }
        }
    }

    impl IdentitySession for FakeSession {
        fn is_loaded(&self) -> bool {
            self.loaded
        }

        fn user_id(&self) -> Option<&str> {
            self.user_id.as_deref()
        }

        fn active_organization(&self) -> Option<&str> {
            self.active.as_deref()
        }

        async fn organization_memberships(&self) -> Result<Vec<MembershipSummary>, AuthError> {
            match &self.memberships {
                Ok(ms) => Ok(ms.clone()),
                Err(msg) => Err(AuthError::ClerkApiError(msg.clone())),
            }
        }

        async fn set_active_organization(
            &mut self,
            organization_id: &str,
        ) -> Result<(), AuthError> {
            if self.activation_fails {
                return Err(AuthError::ClerkApiError("activation rejected".into()));
            }
            self.active = Some(organization_id.to_string());
            Ok(())
        }
    }

    fn membership(org: &str) -> MembershipSummary {
        MembershipSummary {
            organization_id: org.into(),
            role: "org_member".into(),
        }
    }

    #[tokio::test]
    async fn stays_waiting_until_sdk_loads() {
        let mut session = FakeSession::signed_in(vec![membership("org_1")]);
        session.loaded = false;

        let mut bootstrap = OrgBootstrap::new();
        assert_eq!(bootstrap.tick(&mut session).await, BootstrapState::Waiting);
        assert_eq!(session.active, None);

        session.loaded = true;
        assert_eq!(bootstrap.tick(&mut session).await, BootstrapState::Resolved);
        assert_eq!(session.active.as_deref(), Some("org_1"));
    }

    #[tokio::test]
    async fn resolves_immediately_when_signed_out() {
        let mut session = FakeSession::signed_in(vec![membership("org_1")]);
        session.user_id = None;

        let mut bootstrap = OrgBootstrap::new();
        assert_eq!(bootstrap.tick(&mut session).await, BootstrapState::Resolved);
        assert_eq!(session.active, None);
        assert_eq!(bootstrap.activated(), None);
    }

    #[tokio::test]
    async fn resolves_immediately_when_organization_already_active() {
        let mut session = FakeSession::signed_in(vec![membership("org_1"), membership("org_2")]);
        session.active = Some("org_2".into());

        let mut bootstrap = OrgBootstrap::new();
        assert_eq!(bootstrap.tick(&mut session).await, BootstrapState::Resolved);
        assert_eq!(session.active.as_deref(), Some("org_2"));
        assert_eq!(bootstrap.activated(), None);
    }

    #[tokio::test]
    async fn activates_first_membership_in_provider_order() {
        let mut session = FakeSession::signed_in(vec![membership("org_b"), membership("org_a")]);

        let mut bootstrap = OrgBootstrap::new();
        assert_eq!(bootstrap.tick(&mut session).await, BootstrapState::Resolved);
        assert_eq!(session.active.as_deref(), Some("org_b"));
        assert_eq!(bootstrap.activated(), Some("org_b"));
    }

    #[tokio::test]
    async fn resolves_without_activation_when_no_memberships() {
        let mut session = FakeSession::signed_in(vec![]);

        let mut bootstrap = OrgBootstrap::new();
        assert_eq!(bootstrap.tick(&mut session).await, BootstrapState::Resolved);
        assert_eq!(session.active, None);
        assert_eq!(bootstrap.activated(), None);
    }

    #[tokio::test]
    async fn membership_fetch_error_still_resolves() {
        let mut session = FakeSession::signed_in(vec![]);
        session.memberships = Err("clerk is down".into());

        let mut bootstrap = OrgBootstrap::new();
        assert_eq!(bootstrap.tick(&mut session).await, BootstrapState::Resolved);
        assert_eq!(session.active, None);
    }

    #[tokio::test]
    async fn activation_error_still_resolves() {
        let mut session = FakeSession::signed_in(vec![membership("org_1")]);
        session.activation_fails = true;

        let mut bootstrap = OrgBootstrap::new();
        assert_eq!(bootstrap.tick(&mut session).await, BootstrapState::Resolved);
        assert_eq!(session.active, None);
        assert_eq!(bootstrap.activated(), None);
    }

    #[tokio::test]
    async fn does_not_rerun_after_resolution() {
        let mut session = FakeSession::signed_in(vec![]);

        let mut bootstrap = OrgBootstrap::new();
        bootstrap.tick(&mut session).await;
        assert_eq!(bootstrap.state(), BootstrapState::Resolved);

        // Memberships appear later in the session — the single-shot
        // bootstrap must not pick them up.
        session.memberships = Ok(vec![membership("org_late")]);
        assert_eq!(bootstrap.tick(&mut session).await, BootstrapState::Resolved);
        assert_eq!(session.active, None);
    }
}
