//! The token-retrieval capability behind the scoped-client factory.
//!
//! A [`TokenSource`] is owned by the identity provider's session object —
//! the provider's SDK handles refresh and caching; callers here only ask
//! for a token when they need one. `cov-db` consumes this trait to mint
//! database clients scoped to the current user.

use std::future::Future;

use thiserror::Error;

/// Options for a token request.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenOptions {
    /// Bypass any token cache and fetch a fresh token. The scoped-client
    /// factory always sets this: a stale token would authenticate the
    /// client as a session that may no longer exist.
    pub skip_cache: bool,
}

/// Failure while retrieving a token from the identity provider.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("identity provider rejected the token request: {0}")]
    Provider(String),

    #[error("token request failed: {0}")]
    Transport(String),
}

/// Async token retrieval owned by an identity-provider session.
///
/// Returns `Ok(None)` when the session cannot produce a token (signed out,
/// expired). Callers must treat `None` as a hard authentication failure —
/// never as permission to proceed unauthenticated.
pub trait TokenSource {
    fn get_token(
        &self,
        options: TokenOptions,
    ) -> impl Future<Output = Result<Option<String>, TokenError>> + Send;
}

/// A fixed-token source for tests and service-credential contexts.
#[derive(Debug, Clone)]
pub struct StaticTokenSource {
    token: Option<String>,
}

impl StaticTokenSource {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// A source that never yields a token (signed-out session).
    #[must_use]
    pub const fn empty() -> Self {
        Self { token: None }
    }
}

impl TokenSource for StaticTokenSource {
    async fn get_token(&self, _options: TokenOptions) -> Result<Option<String>, TokenError> {
        Ok(self.token.clone())
    }
}
