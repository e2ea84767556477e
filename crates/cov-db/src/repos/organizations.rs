//! Organization repository — upsert/get/delete keyed by the Clerk org id.

use cov_core::entities::Organization;

use crate::CovDb;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime};

fn row_to_organization(row: &libsql::Row) -> Result<Organization, DatabaseError> {
    Ok(Organization {
        id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        slug: get_opt_string(row, 2)?,
        domain: get_opt_string(row, 3)?,
        logo_url: get_opt_string(row, 4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
        updated_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl CovDb {
    /// Insert or update an organization keyed by the external org id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the write fails.
    pub async fn upsert_organization(
        &self,
        id: &str,
        name: &str,
        slug: Option<&str>,
        domain: Option<&str>,
        logo_url: Option<&str>,
    ) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO organizations (id, name, slug, domain, logo_url)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET
                   name = ?2,
                   slug = ?3,
                   domain = ?4,
                   logo_url = ?5,
                   updated_at = datetime('now')",
                libsql::params![id, name, slug, domain, logo_url],
            )
            .await?;
        Ok(())
    }

    /// Insert an organization, leaving an existing row untouched.
    ///
    /// Used by the `user.created` path where the payload's embedded
    /// organization may already be mirrored — the uniqueness conflict is
    /// deliberately tolerated and must not clobber fresher data.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the write fails.
    pub async fn insert_organization_if_absent(
        &self,
        id: &str,
        name: &str,
        slug: Option<&str>,
    ) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO organizations (id, name, slug)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO NOTHING",
                libsql::params![id, name, slug],
            )
            .await?;
        Ok(())
    }

    /// Fetch an organization by external org id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn get_organization(
        &self,
        id: &str,
    ) -> Result<Option<Organization>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id, name, slug, domain, logo_url, created_at, updated_at
                 FROM organizations WHERE id = ?1",
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_organization(&row)?)),
            None => Ok(None),
        }
    }

    /// Delete an organization by external org id. Memberships cascade.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the delete fails.
    pub async fn delete_organization(&self, id: &str) -> Result<(), DatabaseError> {
        self.conn()
            .execute("DELETE FROM organizations WHERE id = ?1", [id])
            .await?;
        Ok(())
    }
}
