use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

/// Number of leading hex characters of a fingerprint used as the shard directory
pub const SHARD_PREFIX_LEN: usize = 4;

pub type TenantResult<T> = Result<T, TenantError>;

#[derive(Debug, Error)]
pub enum TenantError {
    #[error("Tenant not found")]
    NotFound,

    #[error("Unable to bind request to tenant: {0}")]
    Binding(String),

    #[error("Error accessing multipart form: {0}")]
    Multipart(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<sqlx::Error> for TenantError {
    fn from(err: sqlx::Error) -> Self {
        TenantError::Database(err.to_string())
    }
}

impl From<std::io::Error> for TenantError {
    fn from(err: std::io::Error) -> Self {
        TenantError::Io(err.to_string())
    }
}

/// Lowercase hex MD5 digest of a tenant name.
///
/// Computed once when the tenant is created; a rename does not refresh it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(name: &str) -> Self {
        Self(shared::crypto::md5_hex(name.as_bytes()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shard directory name: the first four hex characters
    pub fn shard(&self) -> &str {
        self.0.get(..SHARD_PREFIX_LEN).unwrap_or(&self.0)
    }
}

/// A row of the `tenant` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Tenant {
    pub id: i64,
    pub name: String,
    pub md5: Fingerprint,
}

/// Body of create and rename requests. `id` and `md5` may be present in the
/// JSON but are server-owned and ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TenantRequest {
    pub name: String,
}

/// One file written by an upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub filename: String,
    pub content_type: Option<String>,
    pub size: u64,
}
