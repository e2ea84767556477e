//! Handlers for `organizationMembership.*` events.

use cov_core::enums::Role;
use cov_db::CovDb;

use crate::error::SyncError;
use crate::event::{MembershipPayload, parse_payload};

/// `organizationMembership.created` / `.updated` — one upsert serves both,
/// keyed by `(user_id, organization_id)`.
///
/// A membership event for a user with no mirrored profile is an upstream
/// contract violation: the write fails on the foreign key and the error
/// surfaces. No placeholder profile is synthesized from membership data.
///
/// # Errors
///
/// `Validation` on missing fields; `Persistence` on write failure.
pub async fn handle_membership_upserted(
    db: &CovDb,
    data: &serde_json::Value,
) -> Result<(), SyncError> {
    let payload: MembershipPayload = parse_payload(data)?;
    let user_id = &payload.public_user_data.user_id;
    let organization_id = &payload.organization.id;
    let role = Role::from_external(payload.role.as_deref().unwrap_or_default());

    db.upsert_membership(user_id, organization_id, role)
        .await
        .map_err(|error| {
            tracing::error!(
                user_id, organization_id, %error,
                "membership upsert failed"
            );
            SyncError::Persistence(error)
        })?;
    tracing::info!(user_id, organization_id, %role, "membership mirrored");
    Ok(())
}

/// `organizationMembership.deleted` — delete exactly the composite-key row.
///
/// # Errors
///
/// `Validation` on missing fields; `Persistence` on delete failure.
pub async fn handle_membership_deleted(
    db: &CovDb,
    data: &serde_json::Value,
) -> Result<(), SyncError> {
    let payload: MembershipPayload = parse_payload(data)?;
    let user_id = &payload.public_user_data.user_id;
    let organization_id = &payload.organization.id;

    db.delete_membership(user_id, organization_id)
        .await
        .map_err(|error| {
            tracing::error!(
                user_id, organization_id, %error,
                "membership delete failed"
            );
            SyncError::Persistence(error)
        })?;
    tracing::info!(user_id, organization_id, "membership removed");
    Ok(())
}
