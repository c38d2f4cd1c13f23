/// Geographic search strategy
///
/// Filters circles to those whose stored coordinate lies within a radius
/// (kilometers) of a given point, using PostGIS geography functions, and
/// orders by ascending distance instead of recency. The optional skill-level
/// criterion and the unconditional recruiting constraint compose with AND as
/// everywhere else; free-text and prefecture criteria do not apply to this
/// strategy.
///
/// Requires the PostGIS extension. Unlike the full-text strategy, backend
/// errors here are logged and propagated: a caller that asked for distance
/// ordering gets an error, not silently re-ordered results.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;

use crate::models::circle::{Circle, CIRCLE_COLUMNS};
use super::{SearchPage, SearchQuery, SearchStrategy};

/// Radius search around a coordinate, nearest first
#[derive(Debug, Clone, Copy)]
pub struct GeoSearch {
    /// Latitude of the search center
    pub latitude: f64,

    /// Longitude of the search center
    pub longitude: f64,

    /// Search radius in kilometers
    pub radius_km: f64,
}

impl GeoSearch {
    /// Default search radius when the caller does not supply one
    pub const DEFAULT_RADIUS_KM: f64 = 10.0;
}

#[async_trait]
impl SearchStrategy for GeoSearch {
    async fn search(&self, pool: &PgPool, query: &SearchQuery) -> Result<SearchPage, sqlx::Error> {
        // Point binds are always $1..$3; the optional skill tag is $4
        let mut clauses = vec![
            "ST_DWithin(\
                ST_MakePoint(longitude, latitude)::geography, \
                ST_MakePoint($1, $2)::geography, \
                $3 * 1000)"
                .to_string(),
        ];

        let skill = query
            .filter
            .skill_level
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        if skill.is_some() {
            clauses.push("$4 = ANY(skill_level)".to_string());
        }

        clauses.push("is_recruiting = TRUE".to_string());

        let where_clause = format!("WHERE {}", clauses.join(" AND "));
        let count_sql = format!("SELECT COUNT(*) FROM circles {where_clause}");

        let next = if skill.is_some() { 5 } else { 4 };
        let page_sql = format!(
            "SELECT {CIRCLE_COLUMNS} FROM circles {where_clause} \
             ORDER BY ST_Distance(\
                 ST_MakePoint(longitude, latitude)::geography, \
                 ST_MakePoint($1, $2)::geography) ASC \
             LIMIT ${} OFFSET ${}",
            next,
            next + 1
        );

        let count_fut = async {
            let mut q = sqlx::query_scalar::<_, i64>(&count_sql)
                .bind(self.longitude)
                .bind(self.latitude)
                .bind(self.radius_km);
            if let Some(skill) = skill {
                q = q.bind(skill.to_string());
            }
            q.fetch_one(pool).await
        };

        let page_fut = async {
            let mut q = sqlx::query_as::<_, Circle>(&page_sql)
                .bind(self.longitude)
                .bind(self.latitude)
                .bind(self.radius_km);
            if let Some(skill) = skill {
                q = q.bind(skill.to_string());
            }
            q.bind(query.limit).bind(query.offset()).fetch_all(pool).await
        };

        let (total, circles) = tokio::try_join!(count_fut, page_fut).map_err(|e| {
            error!("Geographic search error: {}", e);
            e
        })?;

        Ok(SearchPage::new(circles, total, query))
    }
}
