use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notice_bar_api::{
    config::Config,
    db, routes,
    services::{content::PgContentLookup, settings::PgSettingsStore, settings::SettingsStore},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    info!("Database connected and migrations applied");

    let settings = Arc::new(PgSettingsStore::new(pool.clone()));
    if settings.install_defaults().await? {
        info!("Installed default banner settings");
    }

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(config, settings, Arc::new(PgContentLookup::new(pool)));
    let app = routes::router(state);

    info!("notice bar API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
