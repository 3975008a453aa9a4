use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Published article or page, as returned by the content lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ContentSummary {
    pub id: i64,
    pub title: String,
}

/// Kinds of content the admin form can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Article,
    Page,
}

impl ContentKind {
    /// Value stored in `content_items.kind`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Article => "article",
            ContentKind::Page => "page",
        }
    }
}

/// Typeahead entry in the shape the select widget expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: i64,
    pub text: String,
}

impl From<ContentSummary> for SearchResult {
    fn from(c: ContentSummary) -> Self {
        Self { id: c.id, text: c.title }
    }
}

/// Query params for GET /admin/search/{articles,pages}.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: String,
}
