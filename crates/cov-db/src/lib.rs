//! # cov-db
//!
//! libSQL persistence for the Covenant mirrored directory.
//!
//! Owns the `profiles`, `organizations`, and `organization_members` tables —
//! a cache of Clerk state written by the webhook sync pipeline and read by
//! the rest of the application — plus the append-only `sync_events` log.
//!
//! Uses the `libsql` crate: local files or `:memory:` for development and
//! tests, remote Turso connections in production. Remote connections carry a
//! bearer token — either the elevated service credential (sync pipeline) or
//! a per-user token minted through [`CovDb::open_scoped`].

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;

use cov_core::token::{TokenOptions, TokenSource};
use error::DatabaseError;
use libsql::Builder;

/// Central database handle for all Covenant directory operations.
///
/// Wraps a libSQL database and connection. Repository methods live in
/// [`repos`] as `impl CovDb` blocks.
pub struct CovDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl CovDb {
    /// Open a local-only database at the given path (no cloud sync).
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let cov_db = Self { db, conn };
        cov_db.run_migrations().await?;
        Ok(cov_db)
    }

    /// Open a remote Turso database with the given bearer token.
    ///
    /// Does NOT run migrations — the hosted schema is managed by the
    /// deployment, not by every client. Call [`Self::migrate`] explicitly
    /// from the service-credential connection if needed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection cannot be established.
    pub async fn open_remote(url: &str, auth_token: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await?;
        let conn = db.connect()?;
        Ok(Self { db, conn })
    }

    /// Mint a database client scoped to the current user's identity.
    ///
    /// Requests a fresh token from the session-owned [`TokenSource`]
    /// (skipping any token cache) and opens a remote connection carrying it.
    /// The absence of a token is always a hard failure — this never falls
    /// back to an unauthenticated client.
    ///
    /// One client per logical operation; the identity provider's SDK owns
    /// token refresh, not this factory.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotAuthenticated` if the source yields no
    /// token, `DatabaseError::TokenSource` if retrieval itself fails, or a
    /// connection error from the remote open.
    pub async fn open_scoped(
        url: &str,
        tokens: &impl TokenSource,
    ) -> Result<Self, DatabaseError> {
        let token = tokens
            .get_token(TokenOptions { skip_cache: true })
            .await
            .map_err(|e| DatabaseError::TokenSource(e.to_string()))?
            .ok_or(DatabaseError::NotAuthenticated)?;
        Self::open_remote(url, &token).await
    }

    /// Run the embedded migrations on this connection.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Migration` on failure.
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        self.run_migrations().await
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}
