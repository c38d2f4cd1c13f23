/// Review model and database operations
///
/// A review belongs to exactly one circle and one user. Ratings are 1-5
/// integers, enforced both at request validation and by a DB CHECK. After
/// any review write the caller refreshes the circle's rating aggregate via
/// `Circle::refresh_rating`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

const REVIEW_COLUMNS: &str = "id, circle_id, user_id, rating, comment, created_at";

/// Circle review
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Unique review ID
    pub id: Uuid,

    /// Circle being reviewed
    pub circle_id: Uuid,

    /// Author of the review
    pub user_id: Uuid,

    /// Rating, 1-5
    pub rating: i32,

    /// Review text
    pub comment: String,

    /// When the review was posted
    pub created_at: DateTime<Utc>,
}

/// Input for creating a review
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReview {
    /// Circle being reviewed
    pub circle_id: Uuid,

    /// Author
    pub user_id: Uuid,

    /// Rating, 1-5
    pub rating: i32,

    /// Review text
    pub comment: String,
}

impl Review {
    /// Creates a review
    ///
    /// The caller is expected to refresh the circle's rating aggregate
    /// afterwards.
    pub async fn create(pool: &PgPool, data: CreateReview) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Review>(&format!(
            "INSERT INTO reviews (circle_id, user_id, rating, comment) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {REVIEW_COLUMNS}"
        ))
        .bind(data.circle_id)
        .bind(data.user_id)
        .bind(data.rating)
        .bind(data.comment)
        .fetch_one(pool)
        .await
    }

    /// Lists a circle's reviews, newest first
    pub async fn list_by_circle(pool: &PgPool, circle_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Review>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews \
             WHERE circle_id = $1 \
             ORDER BY created_at DESC"
        ))
        .bind(circle_id)
        .fetch_all(pool)
        .await
    }

    /// Deletes a review
    ///
    /// Returns true if a row was deleted. The caller refreshes the rating
    /// aggregate afterwards.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_serializes_camel_case() {
        let review = Review {
            id: Uuid::new_v4(),
            circle_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            rating: 4,
            comment: "楽しかったです".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&review).unwrap();
        assert!(json.get("circleId").is_some());
        assert!(json.get("userId").is_some());
        assert_eq!(json["rating"], 4);
    }
}
