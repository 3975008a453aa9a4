use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    models::content::{ContentKind, ContentSummary},
    services::settings::StoreError,
};

/// Maximum number of typeahead results per query.
pub const SEARCH_RESULT_LIMIT: usize = 20;
/// Shorter terms return nothing; the select widget waits for two characters.
pub const MIN_SEARCH_TERM_CHARS: usize = 2;

/// Read-only search over the site's published content.
#[async_trait]
pub trait ContentLookup: Send + Sync {
    /// Published items of `kind` whose title contains `term` (case-insensitive),
    /// best matches first, at most `limit` of them.
    async fn search(
        &self,
        kind: ContentKind,
        term: &str,
        limit: usize,
    ) -> Result<Vec<ContentSummary>, StoreError>;

    /// Items of `kind` with the given ids, whatever their status, in the
    /// order of `ids`. Ids with no matching item are left out.
    async fn find_by_ids(
        &self,
        kind: ContentKind,
        ids: &[i64],
    ) -> Result<Vec<ContentSummary>, StoreError>;
}

pub async fn search_articles(
    lookup: &dyn ContentLookup,
    term: &str,
) -> Result<Vec<ContentSummary>, StoreError> {
    search_published(lookup, ContentKind::Article, term).await
}

pub async fn search_pages(
    lookup: &dyn ContentLookup,
    term: &str,
) -> Result<Vec<ContentSummary>, StoreError> {
    search_published(lookup, ContentKind::Page, term).await
}

async fn search_published(
    lookup: &dyn ContentLookup,
    kind: ContentKind,
    term: &str,
) -> Result<Vec<ContentSummary>, StoreError> {
    let term = term.trim();
    if term.chars().count() < MIN_SEARCH_TERM_CHARS {
        return Ok(Vec::new());
    }
    let mut results = lookup.search(kind, term, SEARCH_RESULT_LIMIT).await?;
    results.truncate(SEARCH_RESULT_LIMIT);
    Ok(results)
}

/// Titles for the ids already selected in the admin form, so the select
/// widget can show labels instead of bare numbers.
pub async fn resolve_selected(
    lookup: &dyn ContentLookup,
    kind: ContentKind,
    ids: &BTreeSet<i64>,
) -> Result<Vec<ContentSummary>, StoreError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = ids.iter().copied().collect();
    lookup.find_by_ids(kind, &ids).await
}

/// Escape LIKE wildcards so the term matches literally (escape char `\`).
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Lookup over the `content_items` table.
pub struct PgContentLookup {
    pool: PgPool,
}

impl PgContentLookup {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentLookup for PgContentLookup {
    async fn search(
        &self,
        kind: ContentKind,
        term: &str,
        limit: usize,
    ) -> Result<Vec<ContentSummary>, StoreError> {
        let escaped = escape_like(term);
        let items = sqlx::query_as::<_, ContentSummary>(
            r"SELECT id, title
               FROM content_items
               WHERE kind = $1
                 AND status = 'publish'
                 AND title ILIKE $2 ESCAPE '\'
               ORDER BY (title ILIKE $3 ESCAPE '\') DESC,
                        published_at DESC NULLS LAST,
                        id DESC
               LIMIT $4",
        )
        .bind(kind.as_str())
        .bind(format!("%{escaped}%"))
        .bind(format!("{escaped}%"))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn find_by_ids(
        &self,
        kind: ContentKind,
        ids: &[i64],
    ) -> Result<Vec<ContentSummary>, StoreError> {
        let items = sqlx::query_as::<_, ContentSummary>(
            "SELECT id, title
             FROM content_items
             WHERE kind = $1 AND id = ANY($2)
             ORDER BY array_position($2, id)",
        )
        .bind(kind.as_str())
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }
}
