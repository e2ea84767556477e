//! Handlers for `organization.*` events.

use cov_db::CovDb;

use crate::error::SyncError;
use crate::event::{DeletedPayload, OrganizationPayload, parse_payload};

/// `organization.created` / `organization.updated` — one upsert serves both,
/// keyed by the external org id.
///
/// # Errors
///
/// `Validation` on missing fields; `Persistence` on write failure.
pub async fn handle_organization_upserted(
    db: &CovDb,
    data: &serde_json::Value,
) -> Result<(), SyncError> {
    let payload: OrganizationPayload = parse_payload(data)?;
    db.upsert_organization(
        &payload.id,
        &payload.name,
        payload.slug.as_deref(),
        payload.domain.as_deref(),
        payload.logo_url.as_deref(),
    )
    .await
    .map_err(|error| {
        tracing::error!(organization_id = %payload.id, %error, "organization upsert failed");
        SyncError::Persistence(error)
    })?;
    tracing::info!(organization_id = %payload.id, "organization mirrored");
    Ok(())
}

/// `organization.deleted` — hard delete; memberships cascade.
///
/// # Errors
///
/// `Validation` if the id is missing; `Persistence` on delete failure.
pub async fn handle_organization_deleted(
    db: &CovDb,
    data: &serde_json::Value,
) -> Result<(), SyncError> {
    let payload: DeletedPayload = parse_payload(data)?;
    db.delete_organization(&payload.id).await.map_err(|error| {
        tracing::error!(organization_id = %payload.id, %error, "organization delete failed");
        SyncError::Persistence(error)
    })?;
    tracing::info!(organization_id = %payload.id, "organization removed");
    Ok(())
}
