use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::TenantStore;
use crate::models::{Fingerprint, Tenant, TenantError, TenantResult};

#[derive(Debug, Default)]
struct Registry {
    last_id: i64,
    tenants: BTreeMap<i64, Tenant>,
}

/// In-process tenant store. Identifiers start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct MemoryTenantStore {
    registry: RwLock<Registry>,
}

impl MemoryTenantStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TenantStore for MemoryTenantStore {
    async fn get(&self, id: i64) -> TenantResult<Tenant> {
        let registry = self.registry.read().await;
        registry.tenants.get(&id).cloned().ok_or(TenantError::NotFound)
    }

    async fn get_by_name(&self, name: &str) -> TenantResult<Tenant> {
        let registry = self.registry.read().await;
        registry
            .tenants
            .values()
            .find(|tenant| tenant.name == name)
            .cloned()
            .ok_or(TenantError::NotFound)
    }

    async fn create(&self, name: String) -> TenantResult<Tenant> {
        let md5 = Fingerprint::of(&name);

        let mut registry = self.registry.write().await;
        registry.last_id += 1;
        let tenant = Tenant {
            id: registry.last_id,
            name,
            md5,
        };
        registry.tenants.insert(tenant.id, tenant.clone());

        tracing::debug!("Created tenant in memory: id={}", tenant.id);
        Ok(tenant)
    }

    async fn update(&self, id: i64, name: String) -> TenantResult<Tenant> {
        let mut registry = self.registry.write().await;
        let tenant = registry.tenants.get_mut(&id).ok_or(TenantError::NotFound)?;
        tenant.name = name;
        Ok(tenant.clone())
    }

    async fn delete(&self, id: i64) -> TenantResult<()> {
        let mut registry = self.registry.write().await;
        registry
            .tenants
            .remove(&id)
            .map(|_| ())
            .ok_or(TenantError::NotFound)
    }
}
