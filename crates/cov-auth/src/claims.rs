use chrono::{DateTime, Utc};
use cov_core::identity::AuthIdentity;

/// Parsed and validated Clerk JWT claims.
///
/// Wraps the relevant fields from `clerk-rs::ClerkJwt` into a
/// Covenant-specific struct. Produced by JWKS validation, consumed by the
/// server and data layers.
#[derive(Debug, Clone)]
pub struct CovClaims {
    /// Raw JWT string (for passing to Turso as a bearer token).
    pub raw_jwt: String,
    /// Clerk user ID (`sub` claim).
    pub user_id: String,
    /// Organization ID (`org_id` claim). `None` if no active org.
    pub org_id: Option<String>,
    /// Organization slug (`org_slug` claim).
    pub org_slug: Option<String>,
    /// Organization role (`org_role` claim), untranslated.
    pub org_role: Option<String>,
    /// Token expiration time (from `exp` claim).
    pub expires_at: DateTime<Utc>,
}

impl CovClaims {
    /// Convert to a lightweight `AuthIdentity` for cross-crate passing.
    #[must_use]
    pub fn to_identity(&self) -> AuthIdentity {
        AuthIdentity {
            user_id: self.user_id.clone(),
            org_id: self.org_id.clone(),
            org_slug: self.org_slug.clone(),
            org_role: self.org_role.clone(),
        }
    }

    /// Check if the token is expired or expires within `buffer_secs`.
    #[must_use]
    pub fn is_near_expiry(&self, buffer_secs: i64) -> bool {
        let threshold = Utc::now() + chrono::TimeDelta::seconds(buffer_secs);
        self.expires_at <= threshold
    }
}
