//! Tenant persistence
//!
//! Handlers only see [`TenantStore`]; `main` picks the backing store from
//! `DATABASE_DRIVER`.

pub mod memory;
pub mod repository;

pub use memory::MemoryTenantStore;
pub use repository::PgTenantStore;

use async_trait::async_trait;

use crate::models::{Tenant, TenantResult};

#[async_trait]
pub trait TenantStore: Send + Sync {
    /// Fetch a tenant by identifier
    async fn get(&self, id: i64) -> TenantResult<Tenant>;

    /// Fetch a tenant by name; the lowest identifier wins on duplicates
    async fn get_by_name(&self, name: &str) -> TenantResult<Tenant>;

    /// Persist a new tenant and return its stored form
    async fn create(&self, name: String) -> TenantResult<Tenant>;

    /// Overwrite the name of an existing tenant. The fingerprint is kept.
    async fn update(&self, id: i64, name: String) -> TenantResult<Tenant>;

    async fn delete(&self, id: i64) -> TenantResult<()>;
}
