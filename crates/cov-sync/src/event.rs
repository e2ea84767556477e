//! Webhook event envelope and typed payloads.
//!
//! Clerk field names are translated to persisted column names explicitly
//! through these structs — there is no reflection-based mapping. Parsing a
//! payload that is missing a required field is a validation failure before
//! any write happens.

use serde::Deserialize;

use crate::error::SyncError;

/// The JSON envelope every Clerk webhook carries.
#[derive(Debug, Clone, Deserialize)]
pub struct EventEnvelope {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: serde_json::Value,
    /// Always `"event"` for Clerk deliveries; not validated.
    #[serde(default)]
    pub object: String,
}

/// Typed discrimination of the event-type string.
///
/// Unrecognized types map to `Unknown` and are explicitly a no-op — Clerk
/// adds event types over time and an unknown type must never fail the
/// request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    UserCreated,
    UserUpdated,
    UserDeleted,
    OrganizationCreated,
    OrganizationUpdated,
    OrganizationDeleted,
    MembershipCreated,
    MembershipUpdated,
    MembershipDeleted,
    Unknown,
}

impl EventKind {
    /// Map the envelope's `type` string onto a handler. Exact strings only.
    #[must_use]
    pub fn from_type(event_type: &str) -> Self {
        match event_type {
            "user.created" => Self::UserCreated,
            "user.updated" => Self::UserUpdated,
            "user.deleted" => Self::UserDeleted,
            "organization.created" => Self::OrganizationCreated,
            "organization.updated" => Self::OrganizationUpdated,
            "organization.deleted" => Self::OrganizationDeleted,
            "organizationMembership.created" => Self::MembershipCreated,
            "organizationMembership.updated" => Self::MembershipUpdated,
            "organizationMembership.deleted" => Self::MembershipDeleted,
            _ => Self::Unknown,
        }
    }
}

/// `user.created` / `user.updated` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub id: String,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    #[serde(default)]
    pub primary_email_address_id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Present when the user was created straight into an organization
    /// (e.g. accepted an invitation during sign-up).
    #[serde(default)]
    pub organization_memberships: Vec<InitialMembership>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailAddress {
    pub id: String,
    pub email_address: String,
    #[serde(default)]
    pub verification: Option<Verification>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Verification {
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InitialMembership {
    pub organization: OrganizationRef,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

impl UserPayload {
    /// The email of record: the primary address if verified, else the first
    /// verified address. Unverified addresses never become the email of
    /// record — a user with none is rejected upstream of any write.
    #[must_use]
    pub fn verified_email(&self) -> Option<&str> {
        let is_verified = |e: &EmailAddress| {
            e.verification
                .as_ref()
                .is_some_and(|v| v.status == "verified")
        };

        if let Some(primary_id) = self.primary_email_address_id.as_deref() {
            if let Some(primary) = self.email_addresses.iter().find(|e| e.id == primary_id) {
                if is_verified(primary) {
                    return Some(&primary.email_address);
                }
            }
        }
        self.email_addresses
            .iter()
            .find(|e| is_verified(e))
            .map(|e| e.email_address.as_str())
    }

    /// `"First Last"` from whichever name parts are present.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(one), None) | (None, Some(one)) => Some(one.to_string()),
            (None, None) => None,
        }
    }
}

/// `user.deleted` / `organization.deleted` payload — a bare id.
#[derive(Debug, Clone, Deserialize)]
pub struct DeletedPayload {
    pub id: String,
}

/// `organization.created` / `organization.updated` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationPayload {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// `organizationMembership.*` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct MembershipPayload {
    pub organization: OrganizationRef,
    pub public_user_data: PublicUserData,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublicUserData {
    pub user_id: String,
}

/// Deserialize an event `data` object into a typed payload, failing fast
/// with a validation error when required fields are absent.
///
/// # Errors
///
/// Returns `SyncError::Validation` naming the payload type on any
/// deserialization failure.
pub fn parse_payload<T: serde::de::DeserializeOwned>(
    data: &serde_json::Value,
) -> Result<T, SyncError> {
    serde_json::from_value(data.clone()).map_err(|e| {
        SyncError::Validation(format!(
            "{}: {e}",
            std::any::type_name::<T>().rsplit("::").next().unwrap_or("payload")
        ))
    })
}
