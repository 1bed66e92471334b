//! Lazily opened, cached per-tenant store handles

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info};

use crate::error::DomainError;
use crate::repositories::{TenantStore, TenantStoreFactory};

/// Store handles keyed by tenant id, never by domain.
pub struct StoreRegistry {
    factory: Arc<dyn TenantStoreFactory>,
    handles: DashMap<String, TenantStore>,
}

impl StoreRegistry {
    pub fn new(factory: Arc<dyn TenantStoreFactory>) -> Self {
        Self { factory, handles: DashMap::new() }
    }

    /// Returns the cached handle or opens it through the factory.
    pub async fn acquire(&self, tenant_id: &str) -> Result<TenantStore, DomainError> {
        // Shard lock must not be held across the await below.
        let cached = self.handles.get(tenant_id).map(|entry| entry.value().clone());
        if let Some(store) = cached {
            return Ok(store);
        }

        let store = self.factory.open(tenant_id).await?;
        debug!(tenant_id, "tenant store opened");
        Ok(self
            .handles
            .entry(tenant_id.to_string())
            .or_insert(store)
            .value()
            .clone())
    }

    pub async fn provision(&self, tenant_id: &str) -> Result<(), DomainError> {
        self.factory.provision(tenant_id).await?;
        info!(tenant_id, "tenant store provisioned");
        Ok(())
    }

    pub async fn store_exists(&self, tenant_id: &str) -> Result<bool, DomainError> {
        self.factory.exists(tenant_id).await
    }

    /// Forgets the cached handle; the store itself is untouched.
    pub fn evict(&self, tenant_id: &str) -> bool {
        self.handles.remove(tenant_id).is_some()
    }

    /// Evicts the handle and drops the store.
    pub async fn destroy(&self, tenant_id: &str) -> Result<(), DomainError> {
        self.evict(tenant_id);
        self.factory.destroy(tenant_id).await?;
        info!(tenant_id, "tenant store destroyed");
        Ok(())
    }

    pub fn open_handles(&self) -> usize {
        self.handles.len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::repositories::{
        MockFlatRepository, MockFloorRepository, MockHouseRepository, MockTenantStoreFactory,
        MockTenantUserRepository,
    };

    pub(crate) fn mock_store() -> TenantStore {
        TenantStore {
            houses: Arc::new(MockHouseRepository::new()),
            floors: Arc::new(MockFloorRepository::new()),
            flats: Arc::new(MockFlatRepository::new()),
            users: Arc::new(MockTenantUserRepository::new()),
        }
    }

    #[tokio::test]
    async fn test_acquire_opens_once_and_caches() {
        let mut factory = MockTenantStoreFactory::new();
        factory.expect_open().times(1).returning(|_| Ok(mock_store()));
        let registry = StoreRegistry::new(Arc::new(factory));

        registry.acquire("acme").await.unwrap();
        registry.acquire("acme").await.unwrap();
        assert_eq!(registry.open_handles(), 1);
    }

    #[tokio::test]
    async fn test_open_failure_is_not_cached() {
        let mut factory = MockTenantStoreFactory::new();
        factory.expect_open().times(2).returning(|id| {
            Err(DomainError::ProvisioningIncomplete {
                tenant_id: id.to_string(),
                reason: "schema missing".into(),
            })
        });
        let registry = StoreRegistry::new(Arc::new(factory));

        assert!(registry.acquire("acme").await.is_err());
        assert!(matches!(
            registry.acquire("acme").await,
            Err(DomainError::ProvisioningIncomplete { .. })
        ));
        assert_eq!(registry.open_handles(), 0);
    }

    #[tokio::test]
    async fn test_destroy_evicts_handle() {
        let mut factory = MockTenantStoreFactory::new();
        factory.expect_open().returning(|_| Ok(mock_store()));
        factory.expect_destroy().times(1).returning(|_| Ok(()));
        let registry = StoreRegistry::new(Arc::new(factory));

        registry.acquire("acme").await.unwrap();
        registry.destroy("acme").await.unwrap();
        assert_eq!(registry.open_handles(), 0);
    }
}
