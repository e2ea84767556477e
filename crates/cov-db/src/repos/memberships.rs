//! Membership repository — keyed by the composite `(user_id, organization_id)`.

use cov_core::entities::OrgMembership;
use cov_core::enums::Role;

use crate::CovDb;
use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_enum};

fn row_to_membership(row: &libsql::Row) -> Result<OrgMembership, DatabaseError> {
    Ok(OrgMembership {
        user_id: row.get::<String>(0)?,
        organization_id: row.get::<String>(1)?,
        role: parse_enum(&row.get::<String>(2)?)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
        updated_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl CovDb {
    /// Insert or update a membership keyed by `(user_id, organization_id)`.
    ///
    /// The profile and organization rows must already exist — a missing
    /// profile is an upstream contract violation and surfaces as a
    /// foreign-key failure rather than being papered over with a placeholder.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the write fails (including FK violations).
    pub async fn upsert_membership(
        &self,
        user_id: &str,
        organization_id: &str,
        role: Role,
    ) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO organization_members (user_id, organization_id, role)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(user_id, organization_id) DO UPDATE SET
                   role = ?3,
                   updated_at = datetime('now')",
                libsql::params![user_id, organization_id, role.as_str()],
            )
            .await?;
        Ok(())
    }

    /// Fetch a single membership by its composite key.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn get_membership(
        &self,
        user_id: &str,
        organization_id: &str,
    ) -> Result<Option<OrgMembership>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT user_id, organization_id, role, created_at, updated_at
                 FROM organization_members
                 WHERE user_id = ?1 AND organization_id = ?2",
                libsql::params![user_id, organization_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_membership(&row)?)),
            None => Ok(None),
        }
    }

    /// List all memberships for a user.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_memberships_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<OrgMembership>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT user_id, organization_id, role, created_at, updated_at
                 FROM organization_members
                 WHERE user_id = ?1
                 ORDER BY organization_id",
                [user_id],
            )
            .await?;
        let mut memberships = Vec::new();
        while let Some(row) = rows.next().await? {
            memberships.push(row_to_membership(&row)?);
        }
        Ok(memberships)
    }

    /// List all members of an organization (team display surface).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_members_of_organization(
        &self,
        organization_id: &str,
    ) -> Result<Vec<OrgMembership>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT user_id, organization_id, role, created_at, updated_at
                 FROM organization_members
                 WHERE organization_id = ?1
                 ORDER BY user_id",
                [organization_id],
            )
            .await?;
        let mut memberships = Vec::new();
        while let Some(row) = rows.next().await? {
            memberships.push(row_to_membership(&row)?);
        }
        Ok(memberships)
    }

    /// Delete exactly the `(user_id, organization_id)` membership row.
    ///
    /// Other memberships of the same user or organization are untouched.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the delete fails.
    pub async fn delete_membership(
        &self,
        user_id: &str,
        organization_id: &str,
    ) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "DELETE FROM organization_members
                 WHERE user_id = ?1 AND organization_id = ?2",
                libsql::params![user_id, organization_id],
            )
            .await?;
        Ok(())
    }
}
