//! Session-owned token minting and the production identity session.
//!
//! The Clerk session is the owner of token lifecycle: this module asks it
//! for tokens and memberships but never stores or refreshes tokens itself.

use cov_core::token::{TokenError, TokenOptions, TokenSource};
use serde::Deserialize;

use crate::bootstrap::{IdentitySession, MembershipSummary};
use crate::error::AuthError;
use crate::org;

const CLERK_API_BASE: &str = "https://api.clerk.com/v1";

/// Mints session tokens from the Clerk Backend API.
///
/// Each `get_token` call issues `POST /v1/sessions/{id}/tokens` — a freshly
/// minted JWT every time, so `skip_cache` is trivially honored. Returns
/// `Ok(None)` when Clerk reports the session gone (404), which callers must
/// treat as a hard authentication failure.
#[derive(Debug, Clone)]
pub struct SessionTokenSource {
    secret_key: String,
    session_id: String,
}

impl SessionTokenSource {
    #[must_use]
    pub fn new(secret_key: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            session_id: session_id.into(),
        }
    }
}

impl TokenSource for SessionTokenSource {
    async fn get_token(&self, _options: TokenOptions) -> Result<Option<String>, TokenError> {
        let url = format!("{CLERK_API_BASE}/sessions/{}/tokens", self.session_id);
        let client = reqwest::Client::new();
        let resp = client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.secret_key))
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| TokenError::Transport(format!("mint session token: {e}")))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            // Session revoked or expired — no token to be had.
            return Ok(None);
        }
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(TokenError::Provider(format!(
                "mint session token: HTTP {status}: {body}"
            )));
        }

        #[derive(Deserialize)]
        struct TokenResponse {
            jwt: String,
        }
        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| TokenError::Provider(format!("parse session token: {e}")))?;
        Ok(Some(token.jwt))
    }
}

/// Production [`IdentitySession`] backed by the Clerk Backend API.
///
/// Clerk owns session state; the active organization lives on this object
/// for the lifetime of the session, mirroring how the provider SDK's
/// `setActive` call scopes subsequent requests.
#[derive(Debug, Clone)]
pub struct ClerkSession {
    secret_key: String,
    user_id: Option<String>,
    active_organization: Option<String>,
}

impl ClerkSession {
    /// A session for a signed-in user with no organization active yet.
    #[must_use]
    pub fn signed_in(secret_key: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            user_id: Some(user_id.into()),
            active_organization: None,
        }
    }

    /// A session with no signed-in user.
    #[must_use]
    pub fn signed_out(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            user_id: None,
            active_organization: None,
        }
    }
}

impl IdentitySession for ClerkSession {
    fn is_loaded(&self) -> bool {
        // A backend-constructed session is loaded by definition; `Waiting`
        // only applies to SDK-driven frontends still initializing.
        true
    }

    fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    fn active_organization(&self) -> Option<&str> {
        self.active_organization.as_deref()
    }

    async fn organization_memberships(&self) -> Result<Vec<MembershipSummary>, AuthError> {
        let Some(user_id) = self.user_id.as_deref() else {
            return Ok(Vec::new());
        };
        let memberships = org::list_user_memberships(&self.secret_key, user_id).await?;
        Ok(memberships
            .into_iter()
            .map(|m| MembershipSummary {
                organization_id: m.organization_id,
                role: m.role,
            })
            .collect())
    }

    async fn set_active_organization(&mut self, organization_id: &str) -> Result<(), AuthError> {
        self.active_organization = Some(organization_id.to_string());
        Ok(())
    }
}
