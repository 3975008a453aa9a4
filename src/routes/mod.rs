pub mod admin;
pub mod banner;
pub mod health;
pub mod metrics;
pub mod search;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Allow the site's base URL, its subdomains, and localhost for development.
fn cors_layer(base_url: String) -> CorsLayer {
    let origin = AllowOrigin::predicate(move |origin: &HeaderValue, _| {
        let o = match origin.to_str() {
            Ok(s) => s,
            Err(_) => return false,
        };
        if o.starts_with("http://localhost") || o.starts_with("http://127.0.0.1") {
            return true;
        }
        if o == base_url {
            return true;
        }
        if let Some(idx) = base_url.find("://") {
            let after_scheme = &base_url[idx + 3..];
            let domain = after_scheme.split('/').next().unwrap_or(after_scheme);
            let domain_clean = domain.split(':').next().unwrap_or(domain);
            if o.ends_with(&format!(".{domain_clean}")) {
                return true;
            }
        }
        false
    });

    CorsLayer::new()
        .allow_methods([Method::GET, Method::PUT, Method::OPTIONS])
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static("x-admin-key"),
            header::HeaderName::from_static("x-search-nonce"),
        ]))
        .allow_origin(origin)
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(state.config.app_base_url.clone());

    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::metrics_handler))
        // Public, called once per page view
        .route("/banner", get(banner::get_banner))
        .route("/banner/render", get(banner::render_banner))
        // Admin
        .route("/admin/banner", get(admin::get_settings).put(admin::update_settings))
        .route("/admin/search/articles", get(search::search_articles))
        .route("/admin/search/pages", get(search::search_pages))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
