use std::env;

use chrono::{FixedOffset, Offset, Utc};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub admin_key: String,
    pub nonce_secret: String,
    pub nonce_ttl_seconds: u64,
    pub app_base_url: String,
    /// Offset applied to schedule dates submitted without one (datetime-local inputs).
    pub site_utc_offset: FixedOffset,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            admin_key: required("ADMIN_KEY")?,
            nonce_secret: required("NONCE_SECRET")?,
            nonce_ttl_seconds: env::var("NONCE_TTL_SECONDS")
                .unwrap_or_else(|_| "43200".into())
                .parse()?,
            app_base_url: env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "http://localhost".into()),
            site_utc_offset: parse_utc_offset(
                &env::var("SITE_UTC_OFFSET").unwrap_or_else(|_| "+00:00".into()),
            )?,
        })
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("Missing required env var: {}", key))
}

/// Parses `+HH:MM`, `-HH:MM`, `Z` or `UTC`.
pub fn parse_utc_offset(raw: &str) -> anyhow::Result<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }

    let (sign, rest) = match raw.as_bytes().first() {
        Some(b'+') => (1, &raw[1..]),
        Some(b'-') => (-1, &raw[1..]),
        _ => anyhow::bail!("Invalid SITE_UTC_OFFSET {raw:?}, expected +HH:MM"),
    };
    let (hours, minutes) = rest
        .split_once(':')
        .ok_or_else(|| anyhow::anyhow!("Invalid SITE_UTC_OFFSET {raw:?}, expected +HH:MM"))?;
    let hours: i32 = hours.parse()?;
    let minutes: i32 = minutes.parse()?;
    if hours > 14 || minutes > 59 {
        anyhow::bail!("SITE_UTC_OFFSET {raw:?} out of range");
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| anyhow::anyhow!("SITE_UTC_OFFSET {raw:?} out of range"))
}
