/// Circle search
///
/// One contract, three interchangeable strategies:
///
/// - [`SubstringSearch`] — the default: case-insensitive substring matching
///   on name/description, newest first
/// - [`fulltext::FullTextSearch`] — relevance-ranked matching that degrades
///   to the substring strategy on backend error
/// - [`geo::GeoSearch`] — radius search around a coordinate, nearest first
///
/// Every strategy composes the same optional criteria with AND (see
/// [`filter::CircleFilter`]), applies the unconditional recruiting
/// constraint, and returns one page plus the total count. The count and the
/// page query are independent and are issued concurrently.

pub mod filter;
pub mod fulltext;
pub mod geo;

use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;

use self::filter::CircleFilter;
use crate::models::circle::{Circle, CIRCLE_COLUMNS};

/// Default page number
pub const DEFAULT_PAGE: i64 = 1;

/// Default page size
pub const DEFAULT_LIMIT: i64 = 10;

/// Largest accepted page size
pub const MAX_LIMIT: i64 = 100;

/// A search request: filter criteria plus pagination
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Optional filter criteria
    pub filter: CircleFilter,

    /// 1-based page number
    pub page: i64,

    /// Page size
    pub limit: i64,
}

impl SearchQuery {
    /// Builds a query with normalized pagination
    pub fn new(filter: CircleFilter, page: Option<i64>, limit: Option<i64>) -> Self {
        let (page, limit) = normalize_pagination(page, limit);
        Self {
            filter,
            page,
            limit,
        }
    }

    /// Row offset of the requested page
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Pagination metadata returned with every page
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Count of all eligible rows, ignoring pagination
    pub total: i64,

    /// ceil(total / limit)
    pub pages: i64,

    /// The page that was returned (1-based)
    pub current: i64,

    /// Page size used
    pub limit: i64,
}

/// One page of search results
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    /// The page of circles
    pub circles: Vec<Circle>,

    /// Pagination metadata
    pub pagination: Pagination,
}

impl SearchPage {
    fn new(circles: Vec<Circle>, total: i64, query: &SearchQuery) -> Self {
        Self {
            circles,
            pagination: Pagination {
                total,
                pages: page_count(total, query.limit),
                current: query.page,
                limit: query.limit,
            },
        }
    }
}

/// A search backend
///
/// Strategies share the contract (AND-composed filters, recruiting
/// constraint, pagination + total) and differ in matching and ordering.
#[async_trait]
pub trait SearchStrategy: Send + Sync {
    /// Runs the search and returns the requested page
    async fn search(&self, pool: &PgPool, query: &SearchQuery) -> Result<SearchPage, sqlx::Error>;
}

/// Default strategy: ILIKE substring matching, newest circles first
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringSearch;

#[async_trait]
impl SearchStrategy for SubstringSearch {
    async fn search(&self, pool: &PgPool, query: &SearchQuery) -> Result<SearchPage, sqlx::Error> {
        let sql = query.filter.to_sql();

        let count_sql = format!("SELECT COUNT(*) FROM circles {}", sql.where_clause);
        let next = sql.binds.len() + 1;
        let page_sql = format!(
            "SELECT {CIRCLE_COLUMNS} FROM circles {} \
             ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            sql.where_clause,
            next,
            next + 1
        );

        let count_fut = async {
            let mut q = sqlx::query_scalar::<_, i64>(&count_sql);
            for bind in &sql.binds {
                q = q.bind(bind.clone());
            }
            q.fetch_one(pool).await
        };

        let page_fut = async {
            let mut q = sqlx::query_as::<_, Circle>(&page_sql);
            for bind in &sql.binds {
                q = q.bind(bind.clone());
            }
            q.bind(query.limit).bind(query.offset()).fetch_all(pool).await
        };

        let (total, circles) = tokio::try_join!(count_fut, page_fut)?;

        Ok(SearchPage::new(circles, total, query))
    }
}

/// Clamps pagination parameters to their legal ranges
///
/// Missing or non-positive pages become page 1; missing limits become 10,
/// and limits are clamped into `1..=100`.
pub fn normalize_pagination(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(DEFAULT_PAGE).max(1);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    (page, limit)
}

/// ceil(total / limit); zero rows means zero pages
pub fn page_count(total: i64, limit: i64) -> i64 {
    (total + limit - 1) / limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_pagination_defaults() {
        assert_eq!(normalize_pagination(None, None), (1, 10));
    }

    #[test]
    fn test_normalize_pagination_clamps() {
        assert_eq!(normalize_pagination(Some(0), Some(0)), (1, 1));
        assert_eq!(normalize_pagination(Some(-5), Some(-5)), (1, 1));
        assert_eq!(normalize_pagination(Some(3), Some(500)), (3, 100));
    }

    #[test]
    fn test_page_count_is_ceiling() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(95, 10), 10);
    }

    #[test]
    fn test_search_query_offset() {
        let query = SearchQuery::new(CircleFilter::default(), Some(1), Some(10));
        assert_eq!(query.offset(), 0);

        let query = SearchQuery::new(CircleFilter::default(), Some(3), Some(25));
        assert_eq!(query.offset(), 50);
    }

    #[test]
    fn test_pagination_serializes_camel_case() {
        let pagination = Pagination {
            total: 42,
            pages: 5,
            current: 2,
            limit: 10,
        };

        let json = serde_json::to_value(&pagination).unwrap();
        assert_eq!(json["total"], 42);
        assert_eq!(json["pages"], 5);
        assert_eq!(json["current"], 2);
        assert_eq!(json["limit"], 10);
    }
}
