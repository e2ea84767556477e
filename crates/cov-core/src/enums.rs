//! The internal role enum and its mapping from Clerk role strings.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Application role inside an organization.
///
/// A flat set — there is no ordering between roles. `Viewer` is the floor:
/// any external role string the mapping does not recognize lands there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Administrator,
    Manager,
    Reviewer,
    Contributor,
    Viewer,
}

impl Role {
    /// Translate a Clerk organization role string into the internal role.
    ///
    /// This is the single authority for role translation — every webhook
    /// handler and every display path goes through it. Total and
    /// case-insensitive: unknown, empty, or missing external roles map to
    /// `Viewer`.
    #[must_use]
    pub fn from_external(external: &str) -> Self {
        match external.to_ascii_lowercase().as_str() {
            "org_admin" => Self::Administrator,
            "org_manager" => Self::Manager,
            "org_reviewer" => Self::Reviewer,
            "org_contributor" => Self::Contributor,
            _ => Self::Viewer,
        }
    }

    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Administrator => "administrator",
            Self::Manager => "manager",
            Self::Reviewer => "reviewer",
            Self::Contributor => "contributor",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
