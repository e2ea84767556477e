//! Clerk authentication configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ClerkConfig {
    /// Clerk publishable key.
    #[serde(default)]
    pub publishable_key: String,

    /// Clerk secret key (Backend API access).
    #[serde(default)]
    pub secret_key: String,

    /// Webhook signing secret (`whsec_...`) from the Clerk dashboard.
    #[serde(default)]
    pub webhook_secret: String,

    /// JWKS URL for token verification.
    #[serde(default)]
    pub jwks_url: String,

    /// Frontend app URL.
    #[serde(default)]
    pub frontend_url: String,
}

impl ClerkConfig {
    /// Check if the Clerk config has the minimum required fields.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.publishable_key.is_empty() && !self.secret_key.is_empty()
    }

    /// Check if inbound webhooks can be verified.
    #[must_use]
    pub fn can_verify_webhooks(&self) -> bool {
        !self.webhook_secret.is_empty()
    }
}
