//! Repository methods for the mirrored directory tables.
//!
//! All mutations are upserts or deletes keyed by external (Clerk) ids —
//! that is the sole concurrency-safety mechanism. Handlers may be invoked
//! concurrently for different events; last write wins at the database level.

pub mod memberships;
pub mod organizations;
pub mod profiles;
pub mod sync_log;

pub use sync_log::{SyncEventRecord, SyncOutcome};
