//! Clerk organization API helpers.
//!
//! Calls the Clerk Backend API directly via `reqwest` (clerk-rs doesn't
//! expose organization-membership endpoints). Requires the Clerk secret key.

use serde::{Deserialize, Serialize};

use crate::AuthError;

const CLERK_API_BASE: &str = "https://api.clerk.com/v1";

/// One of a user's organization memberships, as reported by Clerk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserMembership {
    pub organization_id: String,
    pub organization_name: String,
    pub organization_slug: Option<String>,
    /// Raw Clerk role string. Translate via `Role::from_external` at the
    /// display/gating boundary — never branch on this directly.
    pub role: String,
}

/// List a user's organization memberships, in the order Clerk returns them.
///
/// # Errors
///
/// Returns `AuthError::ClerkApiError` if the API call fails or returns non-200.
pub async fn list_user_memberships(
    secret_key: &str,
    user_id: &str,
) -> Result<Vec<UserMembership>, AuthError> {
    let url = format!("{CLERK_API_BASE}/users/{user_id}/organization_memberships?limit=100");
    let client = reqwest::Client::new();
    let resp = client
        .get(&url)
        .header("Authorization", format!("Bearer {secret_key}"))
        .send()
        .await
        .map_err(|e| AuthError::ClerkApiError(format!("list memberships: {e}")))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(AuthError::ClerkApiError(format!(
            "list memberships: HTTP {status}: {body}"
        )));
    }

    #[derive(Deserialize)]
    struct ListResponse {
        data: Vec<MembershipRecord>,
    }
    #[derive(Deserialize)]
    struct MembershipRecord {
        organization: OrganizationRecord,
        role: String,
    }
    #[derive(Deserialize)]
    struct OrganizationRecord {
        id: String,
        name: String,
        slug: Option<String>,
    }

    let list: ListResponse = resp
        .json()
        .await
        .map_err(|e| AuthError::ClerkApiError(format!("parse memberships: {e}")))?;

    Ok(list
        .data
        .into_iter()
        .map(|m| UserMembership {
            organization_id: m.organization.id,
            organization_name: m.organization.name,
            organization_slug: m.organization.slug,
            role: m.role,
        })
        .collect())
}
