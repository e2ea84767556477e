//! # cov-sync
//!
//! The Clerk → database synchronization pipeline.
//!
//! Clerk is the source of truth for users, organizations, and memberships;
//! this crate mirrors a projection of that state into the directory tables
//! by consuming Clerk's signed webhooks:
//!
//! ```text
//! Clerk → signed POST → receiver → signature verification
//!       → envelope parse → typed dispatch → handler → upsert/delete
//! ```
//!
//! Redelivery is expected (Clerk retries on timeout), so every create/update
//! handler is an upsert keyed by the external id, and deletes are no-ops on
//! already-absent rows. Handlers are safe under concurrent delivery of
//! different events without any in-process coordination — last write wins at
//! the database level.

pub mod error;
pub mod event;
pub mod handlers;
pub mod receiver;
pub mod signature;

pub use error::SyncError;
pub use receiver::{AppState, router};
