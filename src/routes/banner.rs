use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::{
    models::banner::{BannerQuery, Decision},
    services::{
        evaluator::evaluate, metrics::STORE_FAILURES_COUNTER, renderer::render_decision,
        settings::load_settings,
    },
    AppState,
};

/// Evaluate the banner for one page view. Storage trouble suppresses the
/// banner instead of failing the view.
async fn decide(state: &AppState, params: &HashMap<String, String>) -> Decision {
    let settings = match load_settings(state.settings.as_ref(), &state.sanitizer).await {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("banner settings unavailable, suppressing banner: {e}");
            STORE_FAILURES_COUNTER.with_label_values(&["load"]).inc();
            return Decision::Suppressed;
        }
    };

    let query = BannerQuery::from_params(params);
    evaluate(&settings, &query.into_context(Utc::now()))
}

/// GET /banner?is_homepage=&content_type=&page_id= — public, JSON decision.
pub async fn get_banner(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    match decide(&state, &params).await {
        Decision::Show(payload) => Json(json!({ "show": true, "banner": payload })),
        Decision::Suppressed => Json(json!({ "show": false, "banner": null })),
    }
}

/// GET /banner/render — public, HTML fragment to inject (empty when suppressed).
pub async fn render_banner(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    Html(render_decision(&decide(&state, &params).await))
}
