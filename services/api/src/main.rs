use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::{
    AppState,
    config::{AppConfig, StorageBackend},
    create_router,
};
use common::{
    database::{self, DatabaseConfig},
    repositories::{MemoryStore, PgStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("Starting API service");

    let config = AppConfig::from_env()?;

    let app_state = match config.storage {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = database::init_pool(&db_config).await?;

            if database::health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }
            database::run_migrations(&pool).await?;

            let store = Arc::new(PgStore::new(pool));
            AppState::new(&config.jwt(), store.clone(), store)
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; data is lost on shutdown");
            let store = Arc::new(MemoryStore::new());
            AppState::new(&config.jwt(), store.clone(), store)
        }
    };

    // Start the web server
    let app = create_router(app_state);

    let listener = TcpListener::bind(&config.listen_addr).await?;
    info!("API service listening on {}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
