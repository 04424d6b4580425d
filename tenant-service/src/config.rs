use std::str::FromStr;

use anyhow::{anyhow, Result};
use shared::database::DatabaseConfig;
use shared::observability::{LogFormat, LogLevel};

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub storage: StorageConfig,
    pub queue: QueueConfig,
    pub log_format: LogFormat,
    pub log_level: LogLevel,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub driver: StoreDriver,
    pub connection: DatabaseConfig,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub home: String,
    pub max_upload_bytes: usize,
}

/// Message queue endpoint. Recorded for deployment parity; no channels are opened.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    pub url: String,
}

/// Which [`crate::db::TenantStore`] backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreDriver {
    Postgres,
    Memory,
}

impl StoreDriver {
    pub fn as_str(&self) -> &str {
        match self {
            StoreDriver::Postgres => "postgres",
            StoreDriver::Memory => "memory",
        }
    }
}

impl FromStr for StoreDriver {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreDriver::Postgres),
            "memory" => Ok(StoreDriver::Memory),
            other => Err(anyhow!("Unsupported database driver '{}'", other)),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig {
                host: std::env::var("SERVER_HOST")
                    .unwrap_or_else(|_| "localhost".to_string()),
                port: std::env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "1323".to_string())
                    .parse()?,
            },
            database: DatabaseSettings {
                driver: std::env::var("DATABASE_DRIVER")
                    .unwrap_or_else(|_| "postgres".to_string())
                    .parse()?,
                connection: DatabaseConfig::from_env()?,
            },
            storage: StorageConfig {
                home: std::env::var("STORAGE_HOME")
                    .unwrap_or_else(|_| "files".to_string()),
                max_upload_bytes: std::env::var("STORAGE_MAX_UPLOAD_BYTES")
                    .unwrap_or_else(|_| (100 * 1024 * 1024).to_string())
                    .parse()?,
            },
            queue: QueueConfig {
                url: std::env::var("QUEUE_URL")
                    .unwrap_or_else(|_| "amqp://guest@localhost:5672/".to_string()),
            },
            log_format: std::env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse()?,
            log_level: std::env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "info".to_string())
                .parse()?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
