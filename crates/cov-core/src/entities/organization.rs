use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An organization mirrored from Clerk. Lifecycle mirrors the Clerk
/// organization 1:1: created, updated, and hard-deleted with it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub slug: Option<String>,
    pub domain: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
