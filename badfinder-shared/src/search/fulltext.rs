/// Full-text search strategy
///
/// Matches the free-text term against the `search_vector` column (a stored
/// tsvector over name + description) and orders by `ts_rank` relevance, then
/// recency. Prefecture/skill-level criteria and the recruiting constraint
/// compose with AND exactly as in the substring strategy.
///
/// On any backend error this strategy logs at WARN and falls back to
/// [`SubstringSearch`] instead of failing the request — ranking quality is
/// traded for availability. The geographic strategy deliberately does NOT
/// share this policy; its errors propagate.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;

use crate::models::circle::{Circle, CIRCLE_COLUMNS};
use super::{SearchPage, SearchQuery, SearchStrategy, SubstringSearch};

/// Relevance-ranked search with substring fallback
#[derive(Debug, Clone, Copy, Default)]
pub struct FullTextSearch;

#[async_trait]
impl SearchStrategy for FullTextSearch {
    async fn search(&self, pool: &PgPool, query: &SearchQuery) -> Result<SearchPage, sqlx::Error> {
        // Without a term there is nothing to rank
        let Some(term) = query.filter.search_term().map(str::to_string) else {
            return SubstringSearch.search(pool, query).await;
        };

        match run_fulltext(pool, query, &term).await {
            Ok(page) => Ok(page),
            Err(e) => {
                warn!("Full-text search failed, falling back to substring search: {}", e);
                SubstringSearch.search(pool, query).await
            }
        }
    }
}

async fn run_fulltext(
    pool: &PgPool,
    query: &SearchQuery,
    term: &str,
) -> Result<SearchPage, sqlx::Error> {
    // The term is always $1 so the rank expression can reference it too
    let mut clauses = vec!["search_vector @@ plainto_tsquery('simple', $1)".to_string()];
    let mut binds = vec![term.to_string()];

    if let Some(prefecture) = query.filter.prefecture.as_deref().map(str::trim) {
        if !prefecture.is_empty() {
            binds.push(prefecture.to_string());
            clauses.push(format!("prefecture = ${}", binds.len()));
        }
    }

    if let Some(skill) = query.filter.skill_level.as_deref().map(str::trim) {
        if !skill.is_empty() {
            binds.push(skill.to_string());
            clauses.push(format!("${} = ANY(skill_level)", binds.len()));
        }
    }

    clauses.push("is_recruiting = TRUE".to_string());

    let where_clause = format!("WHERE {}", clauses.join(" AND "));
    let count_sql = format!("SELECT COUNT(*) FROM circles {where_clause}");

    let next = binds.len() + 1;
    let page_sql = format!(
        "SELECT {CIRCLE_COLUMNS} FROM circles {where_clause} \
         ORDER BY ts_rank(search_vector, plainto_tsquery('simple', $1)) DESC, created_at DESC \
         LIMIT ${} OFFSET ${}",
        next,
        next + 1
    );

    let count_fut = async {
        let mut q = sqlx::query_scalar::<_, i64>(&count_sql);
        for bind in &binds {
            q = q.bind(bind.clone());
        }
        q.fetch_one(pool).await
    };

    let page_fut = async {
        let mut q = sqlx::query_as::<_, Circle>(&page_sql);
        for bind in &binds {
            q = q.bind(bind.clone());
        }
        q.bind(query.limit).bind(query.offset()).fetch_all(pool).await
    };

    let (total, circles) = tokio::try_join!(count_fut, page_fut)?;

    Ok(SearchPage::new(circles, total, query))
}
