use axum::http::request::Parts;

pub mod admin;
pub mod nonce;

/// Header value as a string, if present and valid visible ASCII.
pub(crate) fn header_str<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}
