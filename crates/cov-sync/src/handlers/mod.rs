//! One handler per (entity, action) pair, plus the typed dispatcher.
//!
//! Handlers receive the database handle explicitly — no module-level client
//! singletons — and rethrow every failure so the receiver can surface a
//! server error and Clerk redelivers. Nothing here assumes delivery order:
//! `updated` events upsert exactly like `created` events, because a retried
//! `created` can arrive after its own `updated`.

mod membership;
mod organization;
mod user;

pub use membership::{handle_membership_deleted, handle_membership_upserted};
pub use organization::{handle_organization_deleted, handle_organization_upserted};
pub use user::{handle_user_created, handle_user_deleted, handle_user_updated};

use cov_db::CovDb;

use crate::error::SyncError;
use crate::event::EventKind;

/// What the dispatcher did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// A handler ran to completion.
    Handled,
    /// The event type is not consumed here; nothing was written.
    Ignored,
}

/// Route a verified event to its handler.
///
/// # Errors
///
/// Propagates the handler's `SyncError`; `Unknown` events never error.
pub async fn dispatch(
    db: &CovDb,
    kind: EventKind,
    event_type: &str,
    data: &serde_json::Value,
) -> Result<Dispatched, SyncError> {
    match kind {
        EventKind::UserCreated => handle_user_created(db, data).await?,
        EventKind::UserUpdated => handle_user_updated(db, data).await?,
        EventKind::UserDeleted => handle_user_deleted(db, data).await?,
        EventKind::OrganizationCreated | EventKind::OrganizationUpdated => {
            handle_organization_upserted(db, data).await?;
        }
        EventKind::OrganizationDeleted => handle_organization_deleted(db, data).await?,
        EventKind::MembershipCreated | EventKind::MembershipUpdated => {
            handle_membership_upserted(db, data).await?;
        }
        EventKind::MembershipDeleted => handle_membership_deleted(db, data).await?,
        EventKind::Unknown => {
            tracing::info!(event_type, "ignoring unrecognized webhook event type");
            return Ok(Dispatched::Ignored);
        }
    }
    Ok(Dispatched::Handled)
}
