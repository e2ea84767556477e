use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user profile mirrored from Clerk.
///
/// `id` equals the Clerk user id. `email` is always a *verified* address —
/// the sync pipeline rejects users with no verified email rather than
/// recording an unverified one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    /// Organization this profile currently belongs to, if any.
    pub organization_id: Option<String>,
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
