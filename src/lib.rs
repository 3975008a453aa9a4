// Library exports for the server, the uninstall tool and tests
pub mod config;
pub mod db;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use config::Config;
use services::{
    content::ContentLookup, nonce::NonceService, sanitizer::Sanitizer, settings::SettingsStore,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub settings: Arc<dyn SettingsStore>,
    pub content: Arc<dyn ContentLookup>,
    pub sanitizer: Sanitizer,
    pub nonces: NonceService,
}

impl AppState {
    pub fn new(
        config: Config,
        settings: Arc<dyn SettingsStore>,
        content: Arc<dyn ContentLookup>,
    ) -> Self {
        let sanitizer = Sanitizer::new(config.site_utc_offset);
        let nonces = NonceService::new(config.nonce_secret.clone(), config.nonce_ttl_seconds);
        Self {
            config: Arc::new(config),
            settings,
            content,
            sanitizer,
            nonces,
        }
    }
}
