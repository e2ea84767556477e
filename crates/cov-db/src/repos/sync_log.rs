//! Sync event log — append-only record of processed webhook deliveries.
//!
//! Written by the receiver after every dispatch, successful or not.
//! Idempotency never depends on this table; it exists so operators can
//! correlate mirrored-row state with Clerk's delivery logs.

use chrono::{DateTime, Utc};

use crate::CovDb;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime};

/// Outcome of processing a single webhook delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Processed,
    Ignored,
    Failed,
}

impl SyncOutcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::Ignored => "ignored",
            Self::Failed => "failed",
        }
    }
}

/// A row from the `sync_events` log.
#[derive(Debug, Clone)]
pub struct SyncEventRecord {
    pub id: i64,
    /// Delivery id from the `svix-id` header, when present.
    pub event_id: Option<String>,
    pub event_type: String,
    pub outcome: String,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CovDb {
    /// Append a sync event entry.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails.
    pub async fn record_sync_event(
        &self,
        event_id: Option<&str>,
        event_type: &str,
        outcome: SyncOutcome,
        detail: Option<&str>,
    ) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO sync_events (event_id, event_type, outcome, detail)
                 VALUES (?1, ?2, ?3, ?4)",
                libsql::params![event_id, event_type, outcome.as_str(), detail],
            )
            .await?;
        Ok(())
    }

    /// Most recent sync events, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn recent_sync_events(
        &self,
        limit: u32,
    ) -> Result<Vec<SyncEventRecord>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id, event_id, event_type, outcome, detail, created_at
                 FROM sync_events ORDER BY id DESC LIMIT ?1",
                libsql::params![limit],
            )
            .await?;
        let mut events = Vec::new();
        while let Some(row) = rows.next().await? {
            events.push(SyncEventRecord {
                id: row.get::<i64>(0)?,
                event_id: get_opt_string(&row, 1)?,
                event_type: row.get::<String>(2)?,
                outcome: row.get::<String>(3)?,
                detail: get_opt_string(&row, 4)?,
                created_at: parse_datetime(&row.get::<String>(5)?)?,
            });
        }
        Ok(events)
    }
}
