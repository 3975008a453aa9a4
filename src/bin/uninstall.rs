//! Remove the banner settings record (and optionally the content index).
//!
//! Usage: uninstall [--purge-content]
//!   --purge-content : also empty the content_items table

use clap::Parser;
use notice_bar_api::services::settings::{PgSettingsStore, SettingsStore};
use sqlx::postgres::PgPoolOptions;

#[derive(Parser)]
#[command(name = "uninstall", about = "Delete the notice bar settings record")]
struct Args {
    /// Also delete every row of content_items
    #[arg(long)]
    purge_content: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable not set"))?;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await?;

    let store = PgSettingsStore::new(pool.clone());
    if store.delete().await? {
        tracing::info!("Deleted banner settings record");
    } else {
        tracing::info!("No banner settings record to delete");
    }

    if args.purge_content {
        let purged = sqlx::query("DELETE FROM content_items")
            .execute(&pool)
            .await?;
        tracing::info!("Purged {} content item(s)", purged.rows_affected());
    }

    Ok(())
}
