//! # cov-config
//!
//! Layered configuration loading for Covenant using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`COVENANT_*` prefix, `__` as separator)
//! 2. Project-level `.covenant/config.toml`
//! 3. User-level `~/.config/covenant/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `COVENANT_TURSO__URL` -> `turso.url`,
//! `COVENANT_CLERK__WEBHOOK_SECRET` -> `clerk.webhook_secret`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use cov_config::CovConfig;
//!
//! // Load from all sources (dotenvy + TOML + env):
//! let config = CovConfig::load_with_dotenv().expect("config");
//!
//! if config.clerk.can_verify_webhooks() {
//!     println!("webhook receiver is configured");
//! }
//! ```

mod clerk;
mod error;
mod server;
mod turso;

pub use clerk::ClerkConfig;
pub use error::ConfigError;
pub use server::ServerConfig;
pub use turso::TursoConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CovConfig {
    #[serde(default)]
    pub clerk: ClerkConfig,
    #[serde(default)]
    pub turso: TursoConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl CovConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables (`COVENANT_*` prefix)
    /// 2. `.covenant/config.toml` (project-local)
    /// 3. `~/.config/covenant/config.toml` (user-global)
    /// 4. Default values
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if figment extraction fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Calls `dotenvy` to load the `.env` file from the workspace root before
    /// building the figment. This is the typical entry point for the server
    /// binary and tests.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if figment extraction fails.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".covenant/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("COVENANT_").split("__"));

        figment
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("covenant").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir
    /// looking for a `.env` file. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // Walk up at most 3 levels (crate -> crates/ -> workspace root)
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        // Fallback: try current directory
        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = CovConfig::default();
        assert!(!config.clerk.is_configured());
        assert!(!config.clerk.can_verify_webhooks());
        assert!(!config.turso.is_configured());
    }

    #[test]
    fn figment_builds_without_files() {
        let figment = CovConfig::figment();
        let config: CovConfig = figment.extract().expect("should extract defaults");
        assert!(!config.turso.is_configured());
        assert_eq!(config.server.bind_addr, "127.0.0.1:8788");
    }
}
