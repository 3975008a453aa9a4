use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{
    middleware::admin::AdminAuth,
    models::{
        banner::RawBannerSettings,
        content::{ContentKind, ContentSummary, SearchResult},
    },
    services::{
        content::resolve_selected,
        metrics::{SETTINGS_UPDATES_COUNTER, STORE_FAILURES_COUNTER},
        settings::StoreError,
        nonce::SEARCH_ACTION,
        settings::load_settings,
    },
    AppState,
};

fn labelled(
    found: Result<Vec<ContentSummary>, StoreError>,
) -> Result<Vec<SearchResult>, (StatusCode, Json<Value>)> {
    found
        .map(|items| items.into_iter().map(SearchResult::from).collect())
        .map_err(|e| {
            STORE_FAILURES_COUNTER.with_label_values(&["lookup"]).inc();
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() })))
        })
}

/// GET /admin/banner — current settings, labels for the selected articles and
/// pages, and a fresh nonce for the search endpoints.
pub async fn get_settings(
    State(state): State<AppState>,
    _auth: AdminAuth,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let settings = load_settings(state.settings.as_ref(), &state.sanitizer)
        .await
        .map_err(|e| {
            STORE_FAILURES_COUNTER.with_label_values(&["load"]).inc();
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() })))
        })?;

    let nonce = state
        .nonces
        .issue(SEARCH_ACTION)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    let content = state.content.as_ref();
    let selected_articles = labelled(
        resolve_selected(content, ContentKind::Article, &settings.selected_article_ids).await,
    )?;
    let selected_pages = labelled(
        resolve_selected(content, ContentKind::Page, &settings.selected_page_ids).await,
    )?;

    Ok(Json(json!({
        "settings": settings,
        "selected_articles": selected_articles,
        "selected_pages": selected_pages,
        "search_nonce": nonce,
    })))
}

/// PUT /admin/banner — sanitize the submitted form and replace the record.
pub async fn update_settings(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let settings = state.sanitizer.sanitize(&RawBannerSettings::from_json(body));

    state.settings.save(&settings).await.map_err(|e| {
        STORE_FAILURES_COUNTER.with_label_values(&["save"]).inc();
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() })))
    })?;

    SETTINGS_UPDATES_COUNTER.inc();
    tracing::info!(
        visibility = settings.visibility_type.as_wire(),
        enabled = !settings.message.trim().is_empty(),
        "banner settings updated"
    );

    Ok(Json(json!({ "settings": settings })))
}
