//! Webhook server configuration.

use serde::{Deserialize, Serialize};

fn default_bind_addr() -> String {
    "127.0.0.1:8788".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Socket address the webhook receiver listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}
