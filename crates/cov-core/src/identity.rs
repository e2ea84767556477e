use serde::{Deserialize, Serialize};

/// Lightweight authenticated user identity for cross-crate passing.
///
/// Produced by `cov-auth` from validated Clerk JWT claims, consumed by the
/// server and data layers. Contains only data fields — no auth logic, no
/// Clerk SDK calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthIdentity {
    /// Clerk user ID (from JWT `sub` claim).
    pub user_id: String,
    /// Clerk organization ID (from JWT `org_id` claim). `None` = no active org.
    pub org_id: Option<String>,
    /// Clerk organization slug (from JWT `org_slug` claim).
    pub org_slug: Option<String>,
    /// Clerk organization role (from JWT `org_role` claim), untranslated.
    /// Display and gating paths translate via `Role::from_external`.
    pub org_role: Option<String>,
}
