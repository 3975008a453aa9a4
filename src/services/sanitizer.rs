use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use serde_json::Value;

use crate::models::banner::{
    is_truthy, BannerSettings, RawBannerSettings, VisibilityType, DEFAULT_BACKGROUND_COLOR,
    DEFAULT_FONT_SIZE_PX, DEFAULT_TEXT_COLOR, MAX_FONT_SIZE_PX, MIN_FONT_SIZE_PX,
};

/// Formats accepted for schedule dates that carry no offset (datetime-local inputs).
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Write-path coercion of untrusted settings into a [`BannerSettings`].
///
/// Total: invalid values are replaced by their documented default rather than
/// rejected, and `sanitize` of an already sanitized record is a no-op. This is
/// the only place where defaults are applied; records read back from storage
/// go through it as well.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    site_offset: FixedOffset,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self { site_offset: Utc.fix() }
    }
}

impl Sanitizer {
    /// `site_offset` is applied to schedule dates submitted without an offset.
    pub fn new(site_offset: FixedOffset) -> Self {
        Self { site_offset }
    }

    pub fn sanitize(&self, raw: &RawBannerSettings) -> BannerSettings {
        let start_at = self.sanitize_timestamp(raw.start_at.as_ref());
        let end_at = self.sanitize_timestamp(raw.end_at.as_ref());
        if let (Some(start), Some(end)) = (start_at, end_at) {
            if start > end {
                tracing::warn!("banner schedule starts ({start}) after it ends ({end}); it will never show");
            }
        }

        BannerSettings {
            message: sanitize_message(raw.message.as_ref()),
            visibility_type: sanitize_visibility(raw.visibility_type.as_ref()),
            selected_article_ids: sanitize_ids(raw.selected_article_ids.as_ref()),
            selected_page_ids: sanitize_ids(raw.selected_page_ids.as_ref()),
            start_at,
            end_at,
            background_color: sanitize_color(raw.background_color.as_ref(), DEFAULT_BACKGROUND_COLOR),
            text_color: sanitize_color(raw.text_color.as_ref(), DEFAULT_TEXT_COLOR),
            font_size_px: sanitize_font_size(raw.font_size_px.as_ref()),
            show_close_button: sanitize_flag(raw.show_close_button.as_ref(), true),
        }
    }

    fn sanitize_timestamp(&self, value: Option<&Value>) -> Option<DateTime<Utc>> {
        let raw = match value? {
            Value::String(s) => s.trim(),
            Value::Number(n) => return n.as_i64().and_then(|secs| DateTime::from_timestamp(secs, 0)),
            _ => return None,
        };
        if raw.is_empty() {
            return None;
        }

        if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
            return Some(t.with_timezone(&Utc));
        }

        let naive = NAIVE_DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })?;

        self.site_offset
            .from_local_datetime(&naive)
            .single()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// Sanitize with schedule dates interpreted as UTC.
pub fn sanitize(raw: &RawBannerSettings) -> BannerSettings {
    Sanitizer::default().sanitize(raw)
}

fn sanitize_message(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => ammonia::clean(s),
        _ => String::new(),
    }
}

fn sanitize_visibility(value: Option<&Value>) -> VisibilityType {
    let Some(raw) = value.and_then(Value::as_str) else {
        return VisibilityType::default();
    };
    VisibilityType::from_wire(raw).unwrap_or_else(|| {
        tracing::warn!("unrecognized visibility type {raw:?}, falling back to site-wide");
        VisibilityType::default()
    })
}

fn sanitize_ids(value: Option<&Value>) -> BTreeSet<i64> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(as_content_id).collect(),
        Some(other) => as_content_id(other).into_iter().collect(),
        None => BTreeSet::new(),
    }
}

fn as_content_id(value: &Value) -> Option<i64> {
    let id = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }?;
    (id >= 0).then_some(id)
}

fn is_hex_color(s: &str) -> bool {
    s.strip_prefix('#').is_some_and(|hex| {
        (hex.len() == 3 || hex.len() == 6) && hex.bytes().all(|b| b.is_ascii_hexdigit())
    })
}

fn sanitize_color(value: Option<&Value>, default: &str) -> String {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| is_hex_color(s))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| default.to_string())
}

fn sanitize_font_size(value: Option<&Value>) -> u8 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        _ => None,
    };

    match parsed {
        Some(px) => px.clamp(MIN_FONT_SIZE_PX.into(), MAX_FONT_SIZE_PX.into()) as u8,
        None => DEFAULT_FONT_SIZE_PX,
    }
}

fn sanitize_flag(value: Option<&Value>, default: bool) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => is_truthy(s),
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawBannerSettings {
        RawBannerSettings::from_json(value)
    }

    #[test]
    fn test_empty_input_yields_defaults() {
        assert_eq!(sanitize(&RawBannerSettings::default()), BannerSettings::default());
        assert_eq!(sanitize(&raw(json!({}))), BannerSettings::default());
    }

    #[test]
    fn test_font_size_clamped() {
        let size = |v: Value| sanitize(&raw(json!({ "font_size_px": v }))).font_size_px;
        assert_eq!(size(json!(5)), 10);
        assert_eq!(size(json!(100)), 32);
        assert_eq!(size(json!("abc")), 16);
        assert_eq!(size(json!("20")), 20);
        assert_eq!(size(json!(" 18.9 ")), 18);
        assert_eq!(size(json!(-4)), 10);
        assert_eq!(size(json!(null)), 16);
        assert_eq!(size(json!([12])), 16);
    }

    #[test]
    fn test_unknown_visibility_type_becomes_site_wide() {
        let s = sanitize(&raw(json!({ "visibility_type": "members-only" })));
        assert_eq!(s.visibility_type, VisibilityType::SiteWide);

        let s = sanitize(&raw(json!({ "visibility_type": 3 })));
        assert_eq!(s.visibility_type, VisibilityType::SiteWide);

        let s = sanitize(&raw(json!({ "visibility_type": "specific-posts" })));
        assert_eq!(s.visibility_type, VisibilityType::SpecificArticles);
    }

    #[test]
    fn test_ids_keep_only_non_negative_integers() {
        let s = sanitize(&raw(json!({
            "selected_article_ids": [3, "7", " 9 ", "abc", -2, 1.5, null, 3],
            "selected_pages": "12"
        })));
        assert_eq!(s.selected_article_ids, BTreeSet::from([3, 7, 9]));
        assert_eq!(s.selected_page_ids, BTreeSet::from([12]));
    }

    #[test]
    fn test_colors_validated() {
        let s = sanitize(&raw(json!({
            "background_color": "#FFAA00",
            "text_color": "red"
        })));
        assert_eq!(s.background_color, "#ffaa00");
        assert_eq!(s.text_color, DEFAULT_TEXT_COLOR);

        let s = sanitize(&raw(json!({ "bg_color": "#abc", "text_color": "#12345" })));
        assert_eq!(s.background_color, "#abc");
        assert_eq!(s.text_color, DEFAULT_TEXT_COLOR);
    }

    #[test]
    fn test_message_markup_stripped() {
        let s = sanitize(&raw(json!({
            "message": "<strong>Sale</strong> today<script>alert(1)</script>"
        })));
        assert_eq!(s.message, "<strong>Sale</strong> today");

        let s = sanitize(&raw(json!({ "message": 42 })));
        assert_eq!(s.message, "");
    }

    #[test]
    fn test_close_button_flag() {
        let flag = |v: Value| sanitize(&raw(json!({ "show_close_button": v }))).show_close_button;
        assert!(flag(json!(true)));
        assert!(flag(json!(1)));
        assert!(flag(json!("on")));
        assert!(!flag(json!(false)));
        assert!(!flag(json!(0)));
        assert!(!flag(json!("0")));
        assert!(!flag(json!("")));
        assert!(sanitize(&RawBannerSettings::default()).show_close_button);
    }

    #[test]
    fn test_schedule_parsing() {
        let s = sanitize(&raw(json!({
            "start_at": "2025-03-01T09:30",
            "end_at": "2025-03-02T10:00:00+02:00"
        })));
        assert_eq!(s.start_at.unwrap().to_rfc3339(), "2025-03-01T09:30:00+00:00");
        assert_eq!(s.end_at.unwrap().to_rfc3339(), "2025-03-02T08:00:00+00:00");

        let s = sanitize(&raw(json!({ "start_date": "", "end_date": "next tuesday" })));
        assert_eq!(s.start_at, None);
        assert_eq!(s.end_at, None);

        let s = sanitize(&raw(json!({ "start_at": "2025-03-01" })));
        assert_eq!(s.start_at.unwrap().to_rfc3339(), "2025-03-01T00:00:00+00:00");
    }

    #[test]
    fn test_naive_schedule_uses_site_offset() {
        let sanitizer = Sanitizer::new(FixedOffset::east_opt(2 * 3600).unwrap());
        let s = sanitizer.sanitize(&raw(json!({ "start_at": "2025-03-01 09:30" })));
        assert_eq!(s.start_at.unwrap().to_rfc3339(), "2025-03-01T07:30:00+00:00");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let inputs = [
            json!({}),
            json!({
                "message": "<p>Hello <a href=\"https://example.com\" onclick=\"x()\">there</a> &amp; welcome</p><iframe></iframe>",
                "visibility_type": "SPECIFIC-PAGES",
                "selected_page_ids": ["4", 2, "x", -1],
                "start_at": "2025-01-01T00:00",
                "end_at": "2025-12-31T23:59:59.250Z",
                "background_color": "#ABCDEF",
                "text_color": "nope",
                "font_size_px": "99",
                "show_close_button": "no"
            }),
            json!({ "message": "a < b > c", "font_size": 3.7, "selected_posts": 5 }),
        ];

        for input in inputs {
            let once = sanitize(&raw(input));
            let twice = sanitize(&RawBannerSettings::from(&once));
            assert_eq!(once, twice);
        }
    }
}
