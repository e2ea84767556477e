//! Turso/libSQL configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TursoConfig {
    /// Database URL (e.g., `libsql://covenant-prod.turso.io`).
    #[serde(default)]
    pub url: String,

    /// Elevated service auth token. The sync pipeline runs outside any user
    /// session and writes with this credential; per-user access goes through
    /// the scoped-client factory instead.
    #[serde(default)]
    pub auth_token: String,

    /// Local database file for development; used when `url` is empty.
    #[serde(default)]
    pub local_path: String,
}

impl TursoConfig {
    /// Check if the config has the minimum required fields for remote access.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.auth_token.is_empty()
    }

    /// Check if local development mode is enabled.
    #[must_use]
    pub fn has_local_path(&self) -> bool {
        !self.local_path.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = TursoConfig::default();
        assert!(!config.is_configured());
        assert!(!config.has_local_path());
    }

    #[test]
    fn configured_when_url_and_token_set() {
        let config = TursoConfig {
            url: "libsql://covenant-prod.turso.io".into(),
            auth_token: "token123".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
    }

    #[test]
    fn local_path_detection() {
        let mut config = TursoConfig::default();
        assert!(!config.has_local_path());

        config.local_path = "./covenant.db".into();
        assert!(config.has_local_path());
    }
}
