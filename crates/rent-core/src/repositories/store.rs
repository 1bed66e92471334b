//! Per-tenant store handle and the factory that provisions it

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DomainError;

use super::{FlatRepository, FloorRepository, HouseRepository, TenantUserRepository};

/// Repositories bound to exactly one tenant's isolated store.
#[derive(Clone)]
pub struct TenantStore {
    pub houses: Arc<dyn HouseRepository>,
    pub floors: Arc<dyn FloorRepository>,
    pub flats: Arc<dyn FlatRepository>,
    pub users: Arc<dyn TenantUserRepository>,
}

impl std::fmt::Debug for TenantStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantStore").finish_non_exhaustive()
    }
}

/// Creates, opens and destroys isolated stores keyed by tenant id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantStoreFactory: Send + Sync {
    /// Creates the store and applies its full schema. Safe to repeat.
    async fn provision(&self, tenant_id: &str) -> Result<(), DomainError>;

    /// Opens a handle; fails with `ProvisioningIncomplete` when the store is missing.
    async fn open(&self, tenant_id: &str) -> Result<TenantStore, DomainError>;

    async fn exists(&self, tenant_id: &str) -> Result<bool, DomainError>;

    async fn destroy(&self, tenant_id: &str) -> Result<(), DomainError>;
}
