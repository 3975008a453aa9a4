//! In-memory stores used by the unit and router tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    models::{
        banner::{BannerSettings, RawBannerSettings},
        content::{ContentKind, ContentSummary},
    },
    services::{content::ContentLookup, settings::{SettingsStore, StoreError}},
};

/// Holds the record as JSON, like the JSONB column does.
#[derive(Default)]
pub struct MemorySettingsStore {
    record: Mutex<Option<Value>>,
}

impl MemorySettingsStore {
    pub fn with_record(record: Value) -> Self {
        Self {
            record: Mutex::new(Some(record)),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load_raw(&self) -> Result<Option<RawBannerSettings>, StoreError> {
        let record = self.record.lock().unwrap().clone();
        Ok(record.map(RawBannerSettings::from_json))
    }

    async fn save(&self, settings: &BannerSettings) -> Result<(), StoreError> {
        *self.record.lock().unwrap() = Some(serde_json::to_value(settings).unwrap());
        Ok(())
    }

    async fn install_defaults(&self) -> Result<bool, StoreError> {
        let mut record = self.record.lock().unwrap();
        if record.is_some() {
            return Ok(false);
        }
        *record = Some(serde_json::to_value(BannerSettings::default()).unwrap());
        Ok(true)
    }

    async fn delete(&self) -> Result<bool, StoreError> {
        Ok(self.record.lock().unwrap().take().is_some())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

struct Item {
    kind: ContentKind,
    published: bool,
    summary: ContentSummary,
}

#[derive(Default)]
pub struct MemoryContentLookup {
    items: Vec<Item>,
}

impl MemoryContentLookup {
    pub fn publish(&mut self, kind: ContentKind, id: i64, title: &str) {
        self.push(kind, id, title, true);
    }

    pub fn draft(&mut self, kind: ContentKind, id: i64, title: &str) {
        self.push(kind, id, title, false);
    }

    fn push(&mut self, kind: ContentKind, id: i64, title: &str, published: bool) {
        self.items.push(Item {
            kind,
            published,
            summary: ContentSummary {
                id,
                title: title.to_string(),
            },
        });
    }
}

#[async_trait]
impl ContentLookup for MemoryContentLookup {
    async fn search(
        &self,
        kind: ContentKind,
        term: &str,
        limit: usize,
    ) -> Result<Vec<ContentSummary>, StoreError> {
        let term = term.to_lowercase();
        let mut matches: Vec<(bool, ContentSummary)> = self
            .items
            .iter()
            .filter(|item| item.kind == kind && item.published)
            .filter_map(|item| {
                let title = item.summary.title.to_lowercase();
                title
                    .contains(&term)
                    .then(|| (title.starts_with(&term), item.summary.clone()))
            })
            .collect();
        // stable: prefix matches first, insertion order otherwise
        matches.sort_by_key(|(prefix, _)| !prefix);
        Ok(matches.into_iter().take(limit).map(|(_, c)| c).collect())
    }

    async fn find_by_ids(
        &self,
        kind: ContentKind,
        ids: &[i64],
    ) -> Result<Vec<ContentSummary>, StoreError> {
        Ok(ids
            .iter()
            .filter_map(|id| {
                self.items
                    .iter()
                    .find(|item| item.kind == kind && item.summary.id == *id)
                    .map(|item| item.summary.clone())
            })
            .collect())
    }
}
