pub mod connection;

pub use connection::{
    DbPool,
    create_connection_pool,
    test_connection,
    health_check,
    close_connections,
};

use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgSslMode};

// Database configuration structure
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database_name: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub ssl_mode: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            username: "tenant".to_string(),
            password: "tenant123".to_string(),
            database_name: "tenant_dev".to_string(),
            max_connections: 10,
            connection_timeout: 30,
            ssl_mode: "prefer".to_string(),
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration from environment variables.
    ///
    /// Absent variables fall back to [`DatabaseConfig::default`]; present but
    /// malformed numeric values are an error.
    pub fn from_env() -> DatabaseResult<Self> {
        let defaults = Self::default();

        Ok(Self {
            host: std::env::var("DATABASE_HOST").unwrap_or(defaults.host),
            port: parse_var("DATABASE_PORT", defaults.port)?,
            username: std::env::var("DATABASE_USER").unwrap_or(defaults.username),
            password: std::env::var("DATABASE_PASSWORD").unwrap_or(defaults.password),
            database_name: std::env::var("DATABASE_NAME").unwrap_or(defaults.database_name),
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            connection_timeout: parse_var("DATABASE_CONNECTION_TIMEOUT", defaults.connection_timeout)?,
            ssl_mode: std::env::var("DATABASE_SSL_MODE").unwrap_or(defaults.ssl_mode),
        })
    }

    /// Build structured connect options for the driver
    pub fn connect_options(&self) -> DatabaseResult<PgConnectOptions> {
        let ssl_mode = PgSslMode::from_str(&self.ssl_mode)
            .map_err(|e| DatabaseError::Config(format!("Invalid ssl mode '{}': {}", self.ssl_mode, e)))?;

        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.database_name)
            .ssl_mode(ssl_mode))
    }

    /// Connection URL with the password masked, safe to log
    pub fn redacted_url(&self) -> String {
        format!(
            "postgresql://{}:***@{}:{}/{}?sslmode={}",
            self.username,
            self.host,
            self.port,
            self.database_name,
            self.ssl_mode
        )
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> DatabaseResult<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| DatabaseError::Config(format!("{} is not valid ({}): {}", name, raw, e))),
        Err(_) => Ok(default),
    }
}

// Error types for database operations
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Query error: {0}")]
    Query(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
