use async_trait::async_trait;
use sqlx::{types::Json, PgPool};

use crate::{
    models::banner::{BannerSettings, RawBannerSettings},
    services::sanitizer::Sanitizer,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Lifecycle owner of the single banner settings record.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Stored record as-is, `None` when nothing is installed.
    async fn load_raw(&self) -> Result<Option<RawBannerSettings>, StoreError>;

    /// Replace the record.
    async fn save(&self, settings: &BannerSettings) -> Result<(), StoreError>;

    /// Write the defaults unless a record already exists. Returns whether it wrote.
    async fn install_defaults(&self) -> Result<bool, StoreError>;

    /// Remove the record. Returns whether there was one.
    async fn delete(&self) -> Result<bool, StoreError>;

    /// Cheap connectivity check for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Load the current settings, resolving every field through the sanitizer.
///
/// A missing record reads as the defaults (empty message, so never shown).
pub async fn load_settings(
    store: &dyn SettingsStore,
    sanitizer: &Sanitizer,
) -> Result<BannerSettings, StoreError> {
    let raw = store.load_raw().await?.unwrap_or_default();
    Ok(sanitizer.sanitize(&raw))
}

/// Settings persisted as JSONB in the singleton `banner_settings` row.
pub struct PgSettingsStore {
    pool: PgPool,
}

impl PgSettingsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsStore for PgSettingsStore {
    async fn load_raw(&self) -> Result<Option<RawBannerSettings>, StoreError> {
        let stored: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT settings FROM banner_settings WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;

        Ok(stored.map(|value| {
            if !value.is_object() {
                tracing::warn!("stored banner settings are not an object, using defaults");
            }
            RawBannerSettings::from_json(value)
        }))
    }

    async fn save(&self, settings: &BannerSettings) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO banner_settings (id, settings) VALUES (1, $1)
             ON CONFLICT (id) DO UPDATE SET
                 settings = EXCLUDED.settings,
                 updated_at = NOW()",
        )
        .bind(Json(settings))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn install_defaults(&self) -> Result<bool, StoreError> {
        let inserted = sqlx::query(
            "INSERT INTO banner_settings (id, settings) VALUES (1, $1)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(Json(BannerSettings::default()))
        .execute(&self.pool)
        .await?;
        Ok(inserted.rows_affected() == 1)
    }

    async fn delete(&self) -> Result<bool, StoreError> {
        let deleted = sqlx::query("DELETE FROM banner_settings WHERE id = 1")
            .execute(&self.pool)
            .await?;
        Ok(deleted.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::banner::VisibilityType;
    use crate::services::memory::MemorySettingsStore;

    #[tokio::test]
    async fn test_missing_record_reads_as_defaults() {
        let store = MemorySettingsStore::default();
        let settings = load_settings(&store, &Sanitizer::default()).await.unwrap();
        assert_eq!(settings, BannerSettings::default());
    }

    #[tokio::test]
    async fn test_install_defaults_only_once() {
        let store = MemorySettingsStore::default();
        assert!(store.install_defaults().await.unwrap());

        let custom = BannerSettings {
            message: "Kept".into(),
            ..BannerSettings::default()
        };
        store.save(&custom).await.unwrap();
        assert!(!store.install_defaults().await.unwrap());

        let settings = load_settings(&store, &Sanitizer::default()).await.unwrap();
        assert_eq!(settings.message, "Kept");
    }

    #[tokio::test]
    async fn test_corrupt_record_is_resanitized() {
        let store = MemorySettingsStore::with_record(json!({
            "message": "Hello",
            "visibility_type": "bogus",
            "font_size_px": 500,
            "text_color": "blue"
        }));
        let settings = load_settings(&store, &Sanitizer::default()).await.unwrap();
        assert_eq!(settings.visibility_type, VisibilityType::SiteWide);
        assert_eq!(settings.font_size_px, 32);
        assert_eq!(settings.text_color, "#ffffff");
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemorySettingsStore::default();
        assert!(!store.delete().await.unwrap());
        store.install_defaults().await.unwrap();
        assert!(store.delete().await.unwrap());
        assert!(store.load_raw().await.unwrap().is_none());
    }
}
