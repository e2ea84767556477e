//! Profile repository — upsert/get/delete keyed by the Clerk user id.

use cov_core::entities::Profile;

use crate::CovDb;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime};

fn row_to_profile(row: &libsql::Row) -> Result<Profile, DatabaseError> {
    Ok(Profile {
        id: row.get::<String>(0)?,
        email: row.get::<String>(1)?,
        full_name: get_opt_string(row, 2)?,
        organization_id: get_opt_string(row, 3)?,
        department: get_opt_string(row, 4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
        updated_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl CovDb {
    /// Insert or update a profile keyed by the external user id.
    ///
    /// `created` and `updated` events both land here: a retried delivery can
    /// arrive out of order, so an update must create the row if it is missing.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the write fails.
    pub async fn upsert_profile(
        &self,
        id: &str,
        email: &str,
        full_name: Option<&str>,
        organization_id: Option<&str>,
    ) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO profiles (id, email, full_name, organization_id)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET
                   email = ?2,
                   full_name = ?3,
                   organization_id = COALESCE(?4, organization_id),
                   updated_at = datetime('now')",
                libsql::params![id, email, full_name, organization_id],
            )
            .await?;
        Ok(())
    }

    /// Fetch a profile by external user id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn get_profile(&self, id: &str) -> Result<Option<Profile>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id, email, full_name, organization_id, department, created_at, updated_at
                 FROM profiles WHERE id = ?1",
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_profile(&row)?)),
            None => Ok(None),
        }
    }

    /// Count profile rows with the given id (0 or 1). Used by tests and
    /// idempotency checks.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_profiles(&self, id: &str) -> Result<i64, DatabaseError> {
        let mut rows = self
            .conn()
            .query("SELECT COUNT(*) FROM profiles WHERE id = ?1", [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    /// Delete a profile by external user id. Memberships cascade.
    ///
    /// Deleting an id with no row is a no-op — deletions must be idempotent
    /// under webhook redelivery.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the delete fails.
    pub async fn delete_profile(&self, id: &str) -> Result<(), DatabaseError> {
        self.conn()
            .execute("DELETE FROM profiles WHERE id = ?1", [id])
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn test_db() -> CovDb {
        CovDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn upsert_then_get_round_trips() {
        let db = test_db().await;
        db.upsert_profile("user_1", "ada@acme.test", Some("Ada Lovelace"), None)
            .await
            .unwrap();

        let profile = db.get_profile("user_1").await.unwrap().unwrap();
        assert_eq!(profile.id, "user_1");
        assert_eq!(profile.email, "ada@acme.test");
        assert_eq!(profile.full_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(profile.organization_id, None);
    }

    #[tokio::test]
    async fn upsert_twice_keeps_one_row() {
        let db = test_db().await;
        db.upsert_profile("user_1", "ada@acme.test", Some("Ada"), None)
            .await
            .unwrap();
        db.upsert_profile("user_1", "ada@acme.test", Some("Ada"), None)
            .await
            .unwrap();

        assert_eq!(db.count_profiles("user_1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn upsert_updates_fields_in_place() {
        let db = test_db().await;
        db.upsert_profile("user_1", "ada@acme.test", Some("Ada"), None)
            .await
            .unwrap();
        db.upsert_profile("user_1", "countess@acme.test", Some("Ada Lovelace"), None)
            .await
            .unwrap();

        let profile = db.get_profile("user_1").await.unwrap().unwrap();
        assert_eq!(profile.email, "countess@acme.test");
        assert_eq!(profile.full_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(db.count_profiles("user_1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn upsert_preserves_existing_organization_when_none_given() {
        let db = test_db().await;
        db.upsert_organization("org_1", "Acme", Some("acme"), None, None)
            .await
            .unwrap();
        db.upsert_profile("user_1", "ada@acme.test", None, Some("org_1"))
            .await
            .unwrap();
        // A later update event carries no membership info
        db.upsert_profile("user_1", "ada@acme.test", Some("Ada"), None)
            .await
            .unwrap();

        let profile = db.get_profile("user_1").await.unwrap().unwrap();
        assert_eq!(profile.organization_id.as_deref(), Some("org_1"));
    }

    #[tokio::test]
    async fn delete_removes_row_and_is_idempotent() {
        let db = test_db().await;
        db.upsert_profile("user_1", "ada@acme.test", None, None)
            .await
            .unwrap();
        db.delete_profile("user_1").await.unwrap();
        assert!(db.get_profile("user_1").await.unwrap().is_none());

        // Redelivered delete is a no-op
        db.delete_profile("user_1").await.unwrap();
    }
}
