mod config;
mod db;
mod handlers;
mod models;
mod routes;
mod storage;

use anyhow::{Context, Result};
use shared::observability::{init_logging, LogConfig};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{Config, StoreDriver};
use crate::db::{MemoryTenantStore, PgTenantStore, TenantStore};
use crate::storage::LocalStorage;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TenantStore>,
    pub storage: LocalStorage,
    /// Present only with the postgres driver
    pub db_pool: Option<PgPool>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    init_logging(LogConfig {
        level: config.log_level,
        format: config.log_format,
        service_name: "tenant-service".to_string(),
        ..Default::default()
    })?;

    info!("Starting Tenant Service...");

    // File storage root
    let storage = LocalStorage::new(&config.storage.home);
    storage.ensure_home().await?;
    info!("File storage ready at {}", storage.home().display());

    // Tenant store
    let (store, db_pool): (Arc<dyn TenantStore>, Option<PgPool>) = match config.database.driver {
        StoreDriver::Postgres => {
            let pool = shared::database::create_connection_pool(&config.database.connection).await?;
            shared::database::test_connection(&pool).await?;

            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Database migrations completed");

            let store: Arc<dyn TenantStore> = Arc::new(PgTenantStore::new(pool.clone()));
            (store, Some(pool))
        }
        StoreDriver::Memory => {
            let store: Arc<dyn TenantStore> = Arc::new(MemoryTenantStore::new());
            (store, None)
        }
    };
    info!("Tenant store initialized: driver={}", config.database.driver.as_str());

    info!(
        "Message queue endpoint configured at {} (no channels opened)",
        config.queue.url
    );

    let state = Arc::new(AppState {
        store,
        storage,
        db_pool: db_pool.clone(),
    });

    let app = routes::router(state, config.storage.max_upload_bytes);

    // Start server
    let addr = config.bind_address();
    info!("Tenant Service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(pool) = db_pool {
        shared::database::close_connections(&pool).await;
    }

    info!("Tenant Service shut down gracefully");
    Ok(())
}

// Graceful shutdown handler
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
