//! Handlers for `user.*` events.

use cov_core::enums::Role;
use cov_db::CovDb;

use crate::error::SyncError;
use crate::event::{DeletedPayload, UserPayload, parse_payload};

/// `user.created` — mirror a new user into `profiles`.
///
/// When the payload carries an initial organization membership the three
/// writes (organization, profile, membership) are logically one unit: the
/// organization insert tolerates an existing row, and any later failure
/// surfaces so Clerk retries the whole event. A partially-applied event is
/// converged by the retry because every write is keyed by external id.
///
/// # Errors
///
/// `Validation` if required fields are missing or no email address is
/// verified; `Persistence` on any write failure.
pub async fn handle_user_created(
    db: &CovDb,
    data: &serde_json::Value,
) -> Result<(), SyncError> {
    let payload: UserPayload = parse_payload(data)?;
    let Some(email) = payload.verified_email() else {
        tracing::warn!(user_id = %payload.id, "rejecting user.created with no verified email");
        return Err(SyncError::Validation(format!(
            "user {} has no verified email address",
            payload.id
        )));
    };
    let full_name = payload.full_name();

    if let Some(initial) = payload.organization_memberships.first() {
        let org = &initial.organization;
        db.insert_organization_if_absent(&org.id, &org.name, org.slug.as_deref())
            .await
            .map_err(|e| log_failure(&payload.id, "user.created", e))?;
        db.upsert_profile(&payload.id, email, full_name.as_deref(), Some(&org.id))
            .await
            .map_err(|e| log_failure(&payload.id, "user.created", e))?;
        let role = Role::from_external(initial.role.as_deref().unwrap_or_default());
        db.upsert_membership(&payload.id, &org.id, role)
            .await
            .map_err(|e| log_failure(&payload.id, "user.created", e))?;
        tracing::info!(
            user_id = %payload.id,
            organization_id = %org.id,
            %role,
            "profile created with initial organization membership"
        );
    } else {
        db.upsert_profile(&payload.id, email, full_name.as_deref(), None)
            .await
            .map_err(|e| log_failure(&payload.id, "user.created", e))?;
        tracing::info!(user_id = %payload.id, "profile created");
    }

    Ok(())
}

/// `user.updated` — upsert, not update-only: a retried delivery can arrive
/// before its `created` counterpart.
///
/// # Errors
///
/// Same contract as [`handle_user_created`]; the verified-email rule applies
/// to updates too.
pub async fn handle_user_updated(
    db: &CovDb,
    data: &serde_json::Value,
) -> Result<(), SyncError> {
    let payload: UserPayload = parse_payload(data)?;
    let Some(email) = payload.verified_email() else {
        tracing::warn!(user_id = %payload.id, "rejecting user.updated with no verified email");
        return Err(SyncError::Validation(format!(
            "user {} has no verified email address",
            payload.id
        )));
    };

    db.upsert_profile(&payload.id, email, payload.full_name().as_deref(), None)
        .await
        .map_err(|e| log_failure(&payload.id, "user.updated", e))?;
    tracing::info!(user_id = %payload.id, "profile updated");
    Ok(())
}

/// `user.deleted` — hard delete; memberships cascade with the profile.
///
/// # Errors
///
/// `Validation` if the id is missing; `Persistence` on delete failure.
pub async fn handle_user_deleted(
    db: &CovDb,
    data: &serde_json::Value,
) -> Result<(), SyncError> {
    let payload: DeletedPayload = parse_payload(data)?;
    db.delete_profile(&payload.id)
        .await
        .map_err(|e| log_failure(&payload.id, "user.deleted", e))?;
    tracing::info!(user_id = %payload.id, "profile deleted");
    Ok(())
}

fn log_failure(
    external_id: &str,
    event_type: &str,
    error: cov_db::error::DatabaseError,
) -> SyncError {
    tracing::error!(external_id, event_type, %error, "sync write failed");
    SyncError::Persistence(error)
}
