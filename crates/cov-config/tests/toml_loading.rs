//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use cov_config::CovConfig;
use pretty_assertions::assert_eq;

#[test]
fn loads_clerk_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[clerk]
publishable_key = "pk_test_abc"
secret_key = "sk_test_def"
webhook_secret = "whsec_dGVzdC1zZWNyZXQ="
jwks_url = "https://example.clerk.accounts.dev/.well-known/jwks.json"
frontend_url = "https://app.example.com"
"#,
        )?;

        let config: CovConfig = Figment::from(Serialized::defaults(CovConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.clerk.publishable_key, "pk_test_abc");
        assert_eq!(config.clerk.secret_key, "sk_test_def");
        assert_eq!(config.clerk.webhook_secret, "whsec_dGVzdC1zZWNyZXQ=");
        assert_eq!(
            config.clerk.jwks_url,
            "https://example.clerk.accounts.dev/.well-known/jwks.json"
        );
        assert!(config.clerk.is_configured());
        assert!(config.clerk.can_verify_webhooks());
        Ok(())
    });
}

#[test]
fn loads_turso_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[turso]
url = "libsql://covenant-test.turso.io"
auth_token = "service-token"
"#,
        )?;

        let config: CovConfig = Figment::from(Serialized::defaults(CovConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.turso.url, "libsql://covenant-test.turso.io");
        assert_eq!(config.turso.auth_token, "service-token");
        assert!(config.turso.is_configured());
        Ok(())
    });
}

#[test]
fn loads_server_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[server]
bind_addr = "0.0.0.0:9000"
"#,
        )?;

        let config: CovConfig = Figment::from(Serialized::defaults(CovConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.server.bind_addr, "0.0.0.0:9000");
        Ok(())
    });
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[clerk]
secret_key = "sk_only"
"#,
        )?;

        let config: CovConfig = Figment::from(Serialized::defaults(CovConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.clerk.secret_key, "sk_only");
        assert!(!config.clerk.is_configured());
        assert!(!config.turso.is_configured());
        assert_eq!(config.server.bind_addr, "127.0.0.1:8788");
        Ok(())
    });
}
