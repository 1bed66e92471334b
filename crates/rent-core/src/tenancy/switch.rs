//! Connection switch: binds a resolved tenant to its store for one task

use std::future::Future;
use std::sync::Arc;

use crate::domain::Tenant;
use crate::error::DomainError;

use super::context::{ActiveTenant, TenantContext};
use super::registry::StoreRegistry;

pub struct TenantSwitch {
    registry: Arc<StoreRegistry>,
}

impl TenantSwitch {
    pub fn new(registry: Arc<StoreRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<StoreRegistry> {
        &self.registry
    }

    /// Acquires the tenant's store. Fails if this task already has a tenant.
    pub async fn activate(&self, tenant: Tenant) -> Result<ActiveTenant, DomainError> {
        if TenantContext::is_active() {
            return Err(DomainError::TenantContextActive);
        }
        let store = self.registry.acquire(&tenant.id).await?;
        Ok(ActiveTenant::new(tenant, store))
    }

    /// Activates `tenant`, runs `f` inside its scope and releases the scope.
    pub async fn run<F, Fut, T>(&self, tenant: Tenant, f: F) -> Result<T, DomainError>
    where
        F: FnOnce(ActiveTenant) -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        let active = self.activate(tenant).await?;
        TenantContext::scope(active.clone(), f(active)).await?
    }
}
