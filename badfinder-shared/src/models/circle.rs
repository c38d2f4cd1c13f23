/// Circle model and database operations
///
/// A circle is a badminton club listing: where it plays, when, for whom, and
/// whether it is currently recruiting. Circles carry three derived fields —
/// `average_rating`, `review_count`, and `member_count` — that are
/// recomputed explicitly after mutating writes rather than by triggers; see
/// [`Circle::refresh_rating`] and [`Circle::refresh_member_count`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE circles (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL,
///     prefecture VARCHAR(20) NOT NULL,
///     city VARCHAR(100) NOT NULL,
///     address VARCHAR(255),
///     activity_frequency VARCHAR(100) NOT NULL,
///     activity_days TEXT[] NOT NULL,
///     activity_times TEXT[] NOT NULL,
///     skill_level TEXT[] NOT NULL,
///     fee INTEGER NOT NULL CHECK (fee >= 0),
///     member_count INTEGER NOT NULL DEFAULT 0,
///     capacity INTEGER,
///     average_rating DOUBLE PRECISION NOT NULL DEFAULT 0,
///     review_count INTEGER NOT NULL DEFAULT 0,
///     is_recruiting BOOLEAN NOT NULL DEFAULT TRUE,
///     website VARCHAR(512),
///     social_links JSONB NOT NULL DEFAULT '{}',
///     ...
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

/// Column list for circle queries
///
/// `search_vector` is deliberately absent: it only exists for the full-text
/// strategy and never leaves the database.
pub const CIRCLE_COLUMNS: &str = "id, name, description, prefecture, city, address, \
     activity_frequency, activity_days, activity_times, skill_level, fee, \
     member_count, capacity, average_rating, review_count, is_recruiting, \
     website, social_links, facilities, equipments, age_groups, gender_ratio, \
     latitude, longitude, created_at, updated_at";

/// Circle listing
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Circle {
    /// Unique circle ID
    pub id: Uuid,

    /// Circle name
    pub name: String,

    /// Free-form description
    pub description: String,

    /// Prefecture (exact-match filter target)
    pub prefecture: String,

    /// City
    pub city: String,

    /// Street address, if published
    pub address: Option<String>,

    /// Activity frequency, e.g. "週2回"
    pub activity_frequency: String,

    /// Days the circle meets
    pub activity_days: Vec<String>,

    /// Time slots the circle meets
    pub activity_times: Vec<String>,

    /// Skill level tags the circle welcomes
    pub skill_level: Vec<String>,

    /// Monthly fee (non-negative)
    pub fee: i32,

    /// Count of active members (derived)
    pub member_count: i32,

    /// Maximum member count, if capped
    pub capacity: Option<i32>,

    /// Average review rating (derived)
    pub average_rating: f64,

    /// Number of reviews (derived)
    pub review_count: i32,

    /// Whether the circle currently accepts new members
    pub is_recruiting: bool,

    /// Website URL
    pub website: Option<String>,

    /// Social media links (opaque key -> URL)
    pub social_links: JsonValue,

    /// Available facilities
    pub facilities: Vec<String>,

    /// Provided equipment
    pub equipments: Vec<String>,

    /// Age groups represented
    pub age_groups: Vec<String>,

    /// Rough gender ratio description
    pub gender_ratio: Option<String>,

    /// Latitude of the home venue, when known
    pub latitude: Option<f64>,

    /// Longitude of the home venue, when known
    pub longitude: Option<f64>,

    /// When the listing was created
    pub created_at: DateTime<Utc>,

    /// When the listing was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new circle
///
/// `is_recruiting` is not accepted here: new listings always start
/// recruiting, regardless of what the client sends.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCircle {
    pub name: String,
    pub description: String,
    pub prefecture: String,
    pub city: String,
    pub address: Option<String>,
    pub activity_frequency: String,
    pub activity_days: Vec<String>,
    pub activity_times: Vec<String>,
    pub skill_level: Vec<String>,
    pub fee: i32,
    pub capacity: Option<i32>,
    pub website: Option<String>,
    pub social_links: Option<JsonValue>,
    pub facilities: Option<Vec<String>>,
    pub equipments: Option<Vec<String>>,
    pub age_groups: Option<Vec<String>>,
    pub gender_ratio: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Input for updating a circle; only non-None fields are touched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCircle {
    pub name: Option<String>,
    pub description: Option<String>,
    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub activity_frequency: Option<String>,
    pub activity_days: Option<Vec<String>>,
    pub activity_times: Option<Vec<String>>,
    pub skill_level: Option<Vec<String>>,
    pub fee: Option<i32>,
    pub capacity: Option<i32>,
    pub is_recruiting: Option<bool>,
    pub website: Option<String>,
    pub social_links: Option<JsonValue>,
    pub facilities: Option<Vec<String>>,
    pub equipments: Option<Vec<String>>,
    pub age_groups: Option<Vec<String>>,
    pub gender_ratio: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Circle {
    /// Creates a new circle listing
    ///
    /// The listing is created with `is_recruiting = TRUE` unconditionally.
    pub async fn create(pool: &PgPool, data: CreateCircle) -> Result<Self, sqlx::Error> {
        let circle = sqlx::query_as::<_, Circle>(&format!(
            "INSERT INTO circles \
                 (name, description, prefecture, city, address, activity_frequency, \
                  activity_days, activity_times, skill_level, fee, capacity, website, \
                  social_links, facilities, equipments, age_groups, gender_ratio, \
                  latitude, longitude, is_recruiting) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, \
                     COALESCE($13, '{{}}'::jsonb), COALESCE($14, '{{}}'), \
                     COALESCE($15, '{{}}'), COALESCE($16, '{{}}'), $17, $18, $19, TRUE) \
             RETURNING {CIRCLE_COLUMNS}"
        ))
        .bind(data.name)
        .bind(data.description)
        .bind(data.prefecture)
        .bind(data.city)
        .bind(data.address)
        .bind(data.activity_frequency)
        .bind(data.activity_days)
        .bind(data.activity_times)
        .bind(data.skill_level)
        .bind(data.fee)
        .bind(data.capacity)
        .bind(data.website)
        .bind(data.social_links)
        .bind(data.facilities)
        .bind(data.equipments)
        .bind(data.age_groups)
        .bind(data.gender_ratio)
        .bind(data.latitude)
        .bind(data.longitude)
        .fetch_one(pool)
        .await?;

        Ok(circle)
    }

    /// Finds a circle by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Circle>(&format!(
            "SELECT {CIRCLE_COLUMNS} FROM circles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Updates a circle; only the fields present in `data` change
    ///
    /// Returns the updated circle, or None if it does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateCircle,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build the SET list from the fields that are present; binds follow
        // in the same order below.
        let mut query = String::from("UPDATE circles SET updated_at = NOW()");
        let mut bind_count = 1;

        macro_rules! set_clause {
            ($field:expr, $column:literal) => {
                if $field.is_some() {
                    bind_count += 1;
                    query.push_str(&format!(", {} = ${}", $column, bind_count));
                }
            };
        }

        set_clause!(data.name, "name");
        set_clause!(data.description, "description");
        set_clause!(data.prefecture, "prefecture");
        set_clause!(data.city, "city");
        set_clause!(data.address, "address");
        set_clause!(data.activity_frequency, "activity_frequency");
        set_clause!(data.activity_days, "activity_days");
        set_clause!(data.activity_times, "activity_times");
        set_clause!(data.skill_level, "skill_level");
        set_clause!(data.fee, "fee");
        set_clause!(data.capacity, "capacity");
        set_clause!(data.is_recruiting, "is_recruiting");
        set_clause!(data.website, "website");
        set_clause!(data.social_links, "social_links");
        set_clause!(data.facilities, "facilities");
        set_clause!(data.equipments, "equipments");
        set_clause!(data.age_groups, "age_groups");
        set_clause!(data.gender_ratio, "gender_ratio");
        set_clause!(data.latitude, "latitude");
        set_clause!(data.longitude, "longitude");

        query.push_str(&format!(" WHERE id = $1 RETURNING {CIRCLE_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Circle>(&query).bind(id);

        macro_rules! push_bind {
            ($field:expr) => {
                if let Some(value) = $field {
                    q = q.bind(value);
                }
            };
        }

        push_bind!(data.name);
        push_bind!(data.description);
        push_bind!(data.prefecture);
        push_bind!(data.city);
        push_bind!(data.address);
        push_bind!(data.activity_frequency);
        push_bind!(data.activity_days);
        push_bind!(data.activity_times);
        push_bind!(data.skill_level);
        push_bind!(data.fee);
        push_bind!(data.capacity);
        push_bind!(data.is_recruiting);
        push_bind!(data.website);
        push_bind!(data.social_links);
        push_bind!(data.facilities);
        push_bind!(data.equipments);
        push_bind!(data.age_groups);
        push_bind!(data.gender_ratio);
        push_bind!(data.latitude);
        push_bind!(data.longitude);

        q.fetch_optional(pool).await
    }

    /// Deletes a circle
    ///
    /// Dependent images, members, and reviews are removed by the foreign-key
    /// cascade. Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM circles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Recomputes the circle's rating aggregate from its review rows
    ///
    /// Called after a review is created, updated, or deleted. The aggregate
    /// read and the update run in one transaction so readers never observe a
    /// torn `average_rating`/`review_count` pair.
    pub async fn refresh_rating(pool: &PgPool, circle_id: Uuid) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (average, count): (f64, i32) = sqlx::query_as(
            "SELECT COALESCE(AVG(rating), 0)::float8, COUNT(*)::int \
             FROM reviews WHERE circle_id = $1",
        )
        .bind(circle_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE circles SET average_rating = $2, review_count = $3, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(circle_id)
        .bind(average)
        .bind(count)
        .execute(&mut *tx)
        .await?;

        tx.commit().await
    }

    /// Recomputes the circle's member count from its active member rows
    ///
    /// Called after a membership is added, removed, or changes status.
    /// Pending members do not count.
    pub async fn refresh_member_count(pool: &PgPool, circle_id: Uuid) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (count,): (i32,) = sqlx::query_as(
            "SELECT COUNT(*)::int FROM circle_members \
             WHERE circle_id = $1 AND status = 'active'",
        )
        .bind(circle_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE circles SET member_count = $2, updated_at = NOW() WHERE id = $1")
            .bind(circle_id)
            .bind(count)
            .execute(&mut *tx)
            .await?;

        tx.commit().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_columns_exclude_search_vector() {
        assert!(!CIRCLE_COLUMNS.contains("search_vector"));
    }

    #[test]
    fn test_circle_serializes_camel_case() {
        let circle = Circle {
            id: Uuid::new_v4(),
            name: "渋谷バドミントンクラブ".to_string(),
            description: "和気あいあいと活動しています".to_string(),
            prefecture: "東京都".to_string(),
            city: "渋谷区".to_string(),
            address: None,
            activity_frequency: "週2回".to_string(),
            activity_days: vec!["土".to_string(), "日".to_string()],
            activity_times: vec!["午前".to_string()],
            skill_level: vec!["初心者".to_string()],
            fee: 3000,
            member_count: 12,
            capacity: Some(30),
            average_rating: 4.5,
            review_count: 8,
            is_recruiting: true,
            website: None,
            social_links: serde_json::json!({}),
            facilities: vec![],
            equipments: vec![],
            age_groups: vec![],
            gender_ratio: None,
            latitude: None,
            longitude: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&circle).unwrap();
        assert_eq!(json["isRecruiting"], true);
        assert_eq!(json["averageRating"], 4.5);
        assert_eq!(json["reviewCount"], 8);
        assert_eq!(json["memberCount"], 12);
        assert_eq!(json["skillLevel"][0], "初心者");
    }

    #[test]
    fn test_update_circle_default_is_empty() {
        let update = UpdateCircle::default();
        assert!(update.name.is_none());
        assert!(update.fee.is_none());
        assert!(update.is_recruiting.is_none());
    }
}
