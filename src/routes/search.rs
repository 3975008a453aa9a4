use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    middleware::{admin::AdminAuth, nonce::SearchNonce},
    models::content::{ContentKind, ContentSummary, SearchQuery, SearchResult},
    services::{
        content,
        metrics::{CONTENT_SEARCHES_COUNTER, STORE_FAILURES_COUNTER},
        settings::StoreError,
    },
    AppState,
};

fn to_response(
    kind: ContentKind,
    found: Result<Vec<ContentSummary>, StoreError>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    CONTENT_SEARCHES_COUNTER.with_label_values(&[kind.as_str()]).inc();
    let found = found.map_err(|e| {
        STORE_FAILURES_COUNTER.with_label_values(&["search"]).inc();
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() })))
    })?;

    let results: Vec<SearchResult> = found.into_iter().map(SearchResult::from).collect();
    Ok(Json(json!({ "results": results })))
}

/// GET /admin/search/articles?search=&nonce=
pub async fn search_articles(
    State(state): State<AppState>,
    _auth: AdminAuth,
    _nonce: SearchNonce,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let found = content::search_articles(state.content.as_ref(), &params.search).await;
    to_response(ContentKind::Article, found)
}

/// GET /admin/search/pages?search=&nonce=
pub async fn search_pages(
    State(state): State<AppState>,
    _auth: AdminAuth,
    _nonce: SearchNonce,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let found = content::search_pages(state.content.as_ref(), &params.search).await;
    to_response(ContentKind::Page, found)
}
