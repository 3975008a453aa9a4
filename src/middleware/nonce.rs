use axum::{
    extract::{FromRequestParts, Query},
    http::{request::Parts, StatusCode},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    middleware::header_str,
    services::{metrics::REJECTED_NONCES_COUNTER, nonce::SEARCH_ACTION},
    AppState,
};

#[derive(Deserialize)]
struct NonceParam {
    nonce: Option<String>,
}

/// Extractor requiring a valid search nonce, from the `nonce` query param or
/// the `X-Search-Nonce` header.
pub struct SearchNonce;

impl FromRequestParts<AppState> for SearchNonce {
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let from_query = Query::<NonceParam>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(p)| p.nonce);
        let token = from_query
            .or_else(|| header_str(parts, "X-Search-Nonce").map(str::to_string))
            .filter(|t| !t.is_empty());

        let Some(token) = token else {
            REJECTED_NONCES_COUNTER.inc();
            return Err((
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "Missing nonce" })),
            ));
        };

        state.nonces.verify(&token, SEARCH_ACTION).map_err(|e| {
            tracing::warn!("search nonce rejected: {e}");
            REJECTED_NONCES_COUNTER.inc();
            (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "Invalid or expired nonce" })),
            )
        })?;

        Ok(SearchNonce)
    }
}
