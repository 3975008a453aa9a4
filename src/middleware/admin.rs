use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    Json,
};
use serde_json::{json, Value};
use subtle::ConstantTimeEq;

use crate::{middleware::header_str, AppState};

/// Header carrying the operator key for the `/admin` routes.
pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

/// Grants access to the settings form and the content search.
pub struct AdminAuth;

/// Constant-time for keys of equal length; a length mismatch fails early.
fn key_matches(given: &str, expected: &str) -> bool {
    given.as_bytes().ct_eq(expected.as_bytes()).into()
}

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(key) = header_str(parts, ADMIN_KEY_HEADER) else {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Missing admin key" })),
            ));
        };

        if !key_matches(key, &state.config.admin_key) {
            tracing::warn!("admin request with a wrong key");
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid admin key" })),
            ));
        }

        Ok(AdminAuth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_matches() {
        assert!(key_matches("admin-key", "admin-key"));
        assert!(!key_matches("admin-kez", "admin-key"));
        assert!(!key_matches("admin", "admin-key"));
        assert!(!key_matches("", "admin-key"));
    }
}
