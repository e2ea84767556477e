//! Cross-cutting error types for Covenant.
//!
//! Domain-specific errors (`DatabaseError`, `AuthError`, `SyncError`) are
//! defined in their respective crates; this module holds only the errors
//! that can originate from any crate.

use thiserror::Error;

/// Errors that can be raised by any Covenant crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (missing field, bad format).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
