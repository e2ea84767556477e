use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::Role;

/// A user's membership in an organization, mirrored from Clerk.
///
/// Unique on `(user_id, organization_id)`. The role is a denormalized copy
/// of Clerk's org-role string, translated through [`Role::from_external`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrgMembership {
    pub user_id: String,
    pub organization_id: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
