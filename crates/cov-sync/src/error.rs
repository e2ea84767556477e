//! Sync pipeline error types.

use cov_db::error::DatabaseError;
use thiserror::Error;

/// Errors raised while processing a webhook delivery.
///
/// The receiver is the single boundary that converts these into HTTP status
/// codes; handlers never swallow them (the one tolerated case — a duplicate
/// organization during `user.created` — is absorbed by `ON CONFLICT DO
/// NOTHING` and so never becomes an error at all).
#[derive(Debug, Error)]
pub enum SyncError {
    /// Missing or invalid webhook signature. Terminal; never retried here.
    #[error("webhook authentication failed: {0}")]
    Authentication(String),

    /// A required field is absent from the event payload. Terminal for the
    /// event; Clerk's own retry/backoff applies once we fail the request.
    #[error("invalid event payload: {0}")]
    Validation(String),

    /// The database layer failed. Rethrown to the receiver, which surfaces
    /// a server error so Clerk redelivers.
    #[error("persistence failure: {0}")]
    Persistence(#[from] DatabaseError),
}
