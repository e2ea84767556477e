use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not authenticated — no active Clerk session")]
    NotAuthenticated,

    #[error("JWKS validation failed: {0}")]
    JwksValidation(String),

    #[error("clerk API error: {0}")]
    ClerkApiError(String),

    #[error("{0}")]
    Other(String),
}
