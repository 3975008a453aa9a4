use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub const DEFAULT_BACKGROUND_COLOR: &str = "#000000";
pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";
pub const DEFAULT_FONT_SIZE_PX: u8 = 16;
pub const MIN_FONT_SIZE_PX: u8 = 10;
pub const MAX_FONT_SIZE_PX: u8 = 32;

/// Rule family deciding which pages the banner is eligible for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisibilityType {
    #[default]
    SiteWide,
    #[serde(rename = "homepage")]
    HomepageOnly,
    SpecificArticles,
    SpecificPages,
}

impl VisibilityType {
    /// Case-insensitive lookup of a wire name, including the legacy `specific-posts`.
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "site-wide" | "sitewide" => Some(Self::SiteWide),
            "homepage" | "homepage-only" => Some(Self::HomepageOnly),
            "specific-articles" | "specific-posts" => Some(Self::SpecificArticles),
            "specific-pages" => Some(Self::SpecificPages),
            _ => None,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::SiteWide => "site-wide",
            Self::HomepageOnly => "homepage",
            Self::SpecificArticles => "specific-articles",
            Self::SpecificPages => "specific-pages",
        }
    }
}

/// The single, sanitized banner configuration.
///
/// Only ever produced by the sanitizer, so every field already holds a valid
/// value and the evaluator never has to apply defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerSettings {
    pub message: String,
    pub visibility_type: VisibilityType,
    pub selected_article_ids: BTreeSet<i64>,
    pub selected_page_ids: BTreeSet<i64>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub background_color: String,
    pub text_color: String,
    pub font_size_px: u8,
    pub show_close_button: bool,
}

impl Default for BannerSettings {
    fn default() -> Self {
        Self {
            message: String::new(),
            visibility_type: VisibilityType::SiteWide,
            selected_article_ids: BTreeSet::new(),
            selected_page_ids: BTreeSet::new(),
            start_at: None,
            end_at: None,
            background_color: DEFAULT_BACKGROUND_COLOR.into(),
            text_color: DEFAULT_TEXT_COLOR.into(),
            font_size_px: DEFAULT_FONT_SIZE_PX,
            show_close_button: true,
        }
    }
}

/// Untrusted settings as submitted by the admin form or read back from storage.
///
/// Every field is optional and loosely typed; the sanitizer decides what each
/// value means. Both snake_case and camelCase names are accepted, plus the
/// legacy option keys (`selected_posts`, `bg_color`, `font_size`, ...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawBannerSettings {
    pub message: Option<Value>,
    pub visibility_type: Option<Value>,
    pub selected_article_ids: Option<Value>,
    pub selected_page_ids: Option<Value>,
    pub start_at: Option<Value>,
    pub end_at: Option<Value>,
    pub background_color: Option<Value>,
    pub text_color: Option<Value>,
    pub font_size_px: Option<Value>,
    pub show_close_button: Option<Value>,
}

impl RawBannerSettings {
    /// Pick the fields out of a JSON object. The first listed key that is
    /// present and non-null wins, so a canonical key shadows its aliases.
    /// Anything other than an object reads as empty input.
    pub fn from_json(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::default();
        };
        let map = &mut map;

        Self {
            message: first_present(map, &["message"]),
            visibility_type: first_present(map, &["visibility_type", "visibilityType"]),
            selected_article_ids: first_present(
                map,
                &["selected_article_ids", "selectedArticleIds", "selected_posts"],
            ),
            selected_page_ids: first_present(
                map,
                &["selected_page_ids", "selectedPageIds", "selected_pages"],
            ),
            start_at: first_present(map, &["start_at", "startAt", "start_date"]),
            end_at: first_present(map, &["end_at", "endAt", "end_date"]),
            background_color: first_present(
                map,
                &["background_color", "backgroundColor", "bg_color"],
            ),
            text_color: first_present(map, &["text_color", "textColor"]),
            font_size_px: first_present(map, &["font_size_px", "fontSizePx", "font_size"]),
            show_close_button: first_present(map, &["show_close_button", "showCloseButton"]),
        }
    }
}

fn first_present(map: &mut Map<String, Value>, keys: &[&str]) -> Option<Value> {
    keys.iter()
        .find_map(|key| map.remove(*key).filter(|v| !v.is_null()))
}

impl From<&BannerSettings> for RawBannerSettings {
    fn from(s: &BannerSettings) -> Self {
        Self {
            message: Some(json!(s.message)),
            visibility_type: Some(json!(s.visibility_type.as_wire())),
            selected_article_ids: Some(json!(s.selected_article_ids)),
            selected_page_ids: Some(json!(s.selected_page_ids)),
            start_at: s.start_at.map(|t| json!(t.to_rfc3339())),
            end_at: s.end_at.map(|t| json!(t.to_rfc3339())),
            background_color: Some(json!(s.background_color)),
            text_color: Some(json!(s.text_color)),
            font_size_px: Some(json!(s.font_size_px)),
            show_close_button: Some(json!(s.show_close_button)),
        }
    }
}

/// Kind of content the current page displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[serde(alias = "post")]
    Article,
    Page,
    #[default]
    #[serde(other)]
    Other,
}

/// Everything the evaluator needs to know about the page view being served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub now: DateTime<Utc>,
    pub is_homepage: bool,
    pub content_type: ContentType,
    pub page_id: Option<i64>,
}

/// What the renderer needs once the banner is known to be visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayPayload {
    pub message: String,
    pub background_color: String,
    pub text_color: String,
    pub font_size_px: u8,
    pub show_close_button: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Suppressed,
    Show(DisplayPayload),
}

impl Decision {
    pub fn is_shown(&self) -> bool {
        matches!(self, Decision::Show(_))
    }

    pub fn payload(&self) -> Option<&DisplayPayload> {
        match self {
            Decision::Show(payload) => Some(payload),
            Decision::Suppressed => None,
        }
    }
}

/// True for the usual form/query spellings of "on": `1`, `true`, `on`, `yes`.
pub fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}

impl ContentType {
    /// Lenient parse of the `content_type` query value; unknown kinds are `Other`.
    pub fn from_param(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "article" | "post" => ContentType::Article,
            "page" => ContentType::Page,
            _ => ContentType::Other,
        }
    }
}

/// Query string of the public banner endpoints.
///
/// Built from the raw key/value pairs so a malformed value never rejects the
/// page view: an empty or non-numeric `page_id` is simply absent.
#[derive(Debug, Default)]
pub struct BannerQuery {
    pub is_homepage: bool,
    pub content_type: ContentType,
    pub page_id: Option<i64>,
}

impl BannerQuery {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let value = |key: &str| params.get(key).map(String::as_str);
        Self {
            is_homepage: value("is_homepage").is_some_and(is_truthy),
            content_type: value("content_type")
                .map(ContentType::from_param)
                .unwrap_or_default(),
            page_id: value("page_id").and_then(|v| v.trim().parse::<i64>().ok()),
        }
    }

    pub fn into_context(self, now: DateTime<Utc>) -> RequestContext {
        RequestContext {
            now,
            is_homepage: self.is_homepage,
            content_type: self.content_type,
            page_id: self.page_id,
        }
    }
}
