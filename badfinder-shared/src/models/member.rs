/// Circle membership model and database operations
///
/// A membership joins one user to one circle, with a status. Joining
/// creates a `pending` row; the circle owner approves it to `active`. Only
/// active members count toward a circle's `member_count`, which the caller
/// refreshes via `Circle::refresh_member_count` after every membership
/// write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

const MEMBER_COLUMNS: &str = "id, circle_id, user_id, status, created_at";

/// Membership status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    /// Approved member; counts toward the circle's member count
    Active,

    /// Join request awaiting approval
    Pending,
}

/// User-circle membership
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CircleMember {
    /// Unique membership ID
    pub id: Uuid,

    /// Circle joined
    pub circle_id: Uuid,

    /// Member
    pub user_id: Uuid,

    /// Membership status
    pub status: MemberStatus,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

impl CircleMember {
    /// Creates a membership
    ///
    /// One membership per (circle, user); a second join attempt hits the
    /// unique constraint and surfaces as a conflict.
    pub async fn create(
        pool: &PgPool,
        circle_id: Uuid,
        user_id: Uuid,
        status: MemberStatus,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, CircleMember>(&format!(
            "INSERT INTO circle_members (circle_id, user_id, status) \
             VALUES ($1, $2, $3) \
             RETURNING {MEMBER_COLUMNS}"
        ))
        .bind(circle_id)
        .bind(user_id)
        .bind(status)
        .fetch_one(pool)
        .await
    }

    /// Finds a membership by circle and user
    pub async fn find(
        pool: &PgPool,
        circle_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, CircleMember>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM circle_members \
             WHERE circle_id = $1 AND user_id = $2"
        ))
        .bind(circle_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Changes a membership's status
    ///
    /// Returns the updated membership, or None if no such membership exists.
    pub async fn update_status(
        pool: &PgPool,
        circle_id: Uuid,
        user_id: Uuid,
        status: MemberStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, CircleMember>(&format!(
            "UPDATE circle_members SET status = $3 \
             WHERE circle_id = $1 AND user_id = $2 \
             RETURNING {MEMBER_COLUMNS}"
        ))
        .bind(circle_id)
        .bind(user_id)
        .bind(status)
        .fetch_optional(pool)
        .await
    }

    /// Removes a membership
    ///
    /// Returns true if a row was deleted.
    pub async fn remove(
        pool: &PgPool,
        circle_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM circle_members WHERE circle_id = $1 AND user_id = $2")
                .bind(circle_id)
                .bind(user_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_status_serialization() {
        assert_eq!(
            serde_json::to_string(&MemberStatus::Active).unwrap(),
            "\"active\""
        );
        assert_eq!(
            serde_json::to_string(&MemberStatus::Pending).unwrap(),
            "\"pending\""
        );
    }

    #[test]
    fn test_member_status_deserialization() {
        let status: MemberStatus = serde_json::from_str("\"active\"").unwrap();
        assert_eq!(status, MemberStatus::Active);
    }
}
