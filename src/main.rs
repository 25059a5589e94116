use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use linkpulse::api;
use linkpulse::config::{Config, DatabaseBackend};
use linkpulse::storage::{EventStore, PostgresStore, SqliteStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Initialize the event store
    let store: Arc<dyn EventStore> = match config.database.backend {
        DatabaseBackend::Sqlite => {
            info!("Using SQLite event store: {}", config.database.url);
            Arc::new(SqliteStore::new(&config.database.url, config.database.max_connections).await?)
        }
        DatabaseBackend::Postgres => {
            info!("Using PostgreSQL event store: {}", config.database.url);
            Arc::new(
                PostgresStore::new(&config.database.url, config.database.max_connections).await?,
            )
        }
    };

    info!("Initializing event store...");
    store.init().await?;
    info!("Event store initialized successfully");

    let config = Arc::new(config);
    let router = api::create_api_router(Arc::clone(&store), Arc::clone(&config));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Tracking server listening on http://{}", addr);
    info!("   - Ingestion endpoints at http://{}/api/track/...", addr);
    info!("   - Operator dashboard API at http://{}/api/admin/...", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
