//! Shared utilities for the tenant service: database pooling, logging setup
//! and content hashing.

// Re-export common dependencies
pub use anyhow;
pub use sqlx;
pub use thiserror;
pub use tracing;

pub mod crypto;
pub mod database;
pub mod observability;
