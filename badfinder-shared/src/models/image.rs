/// Circle image records
///
/// Images are stored as URLs with an optional caption; the files themselves
/// live in external object storage. Rows are removed by the cascade when
/// their circle is deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Circle photo
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Unique image ID
    pub id: Uuid,

    /// Circle the image belongs to
    pub circle_id: Uuid,

    /// Image URL
    pub url: String,

    /// Optional caption
    pub caption: Option<String>,

    /// When the image was added
    pub created_at: DateTime<Utc>,
}

impl Image {
    /// Adds an image to a circle
    pub async fn create(
        pool: &PgPool,
        circle_id: Uuid,
        url: &str,
        caption: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Image>(
            "INSERT INTO images (circle_id, url, caption) \
             VALUES ($1, $2, $3) \
             RETURNING id, circle_id, url, caption, created_at",
        )
        .bind(circle_id)
        .bind(url)
        .bind(caption)
        .fetch_one(pool)
        .await
    }

    /// Lists a circle's images, oldest first
    pub async fn list_by_circle(pool: &PgPool, circle_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Image>(
            "SELECT id, circle_id, url, caption, created_at \
             FROM images WHERE circle_id = $1 \
             ORDER BY created_at ASC",
        )
        .bind(circle_id)
        .fetch_all(pool)
        .await
    }
}
