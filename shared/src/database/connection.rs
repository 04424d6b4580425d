use std::time::Duration;
use sqlx::{
    postgres::PgPoolOptions,
    Pool, Postgres,
};
use tracing::{info, warn, error, debug};

use super::{DatabaseConfig, DatabaseError, DatabaseResult};

/// Type alias for the database pool
pub type DbPool = Pool<Postgres>;

/// Create a new connection pool with the given configuration
pub async fn create_connection_pool(config: &DatabaseConfig) -> DatabaseResult<DbPool> {
    info!("Creating database connection pool...");
    debug!("Database target: {}", config.redacted_url());

    let options = config.connect_options()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect_with(options)
        .await
        .map_err(|e| {
            error!("Failed to create connection pool: {}", e);
            DatabaseError::Connection(e)
        })?;

    info!("Database connection pool created successfully with {} max connections",
          config.max_connections);

    Ok(pool)
}

/// Test database connection
pub async fn test_connection(pool: &DbPool) -> DatabaseResult<()> {
    debug!("Testing database connection...");

    let row: (i32,) = sqlx::query_as("SELECT 1")
        .fetch_one(pool)
        .await
        .map_err(|e| {
            error!("Database connection test failed: {}", e);
            DatabaseError::Connection(e)
        })?;

    if row.0 != 1 {
        return Err(DatabaseError::Query("Unexpected result from connection test".to_string()));
    }

    info!("Database connection test successful");
    Ok(())
}

/// Connection health check
pub async fn health_check(pool: &DbPool) -> bool {
    match test_connection(pool).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Database health check failed: {}", e);
            false
        }
    }
}

/// Close database connections gracefully
pub async fn close_connections(pool: &DbPool) {
    info!("Closing database connections...");
    pool.close().await;
    info!("Database connections closed");
}
