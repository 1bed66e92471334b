//! Task-local tenant context
//!
//! A request is bound to at most one tenant. The binding lives in a tokio
//! task-local and is released when the scoped future completes, errors,
//! panics or is dropped. Handlers also receive the same [`ActiveTenant`]
//! explicitly, so nothing reads a process-wide "current tenant".

use std::future::Future;
use std::sync::Arc;

use tokio::task_local;
use tracing::debug;

use crate::domain::Tenant;
use crate::error::DomainError;
use crate::repositories::TenantStore;

task_local! {
    static ACTIVE_TENANT: ActiveTenant;
}

/// A resolved tenant together with the handle to its isolated store.
#[derive(Debug, Clone)]
pub struct ActiveTenant {
    tenant: Arc<Tenant>,
    store: TenantStore,
}

impl ActiveTenant {
    pub fn new(tenant: Tenant, store: TenantStore) -> Self {
        Self { tenant: Arc::new(tenant), store }
    }

    pub fn tenant(&self) -> &Tenant {
        &self.tenant
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant.id
    }

    pub fn store(&self) -> &TenantStore {
        &self.store
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextState {
    Inactive,
    Active(String),
}

pub struct TenantContext;

impl TenantContext {
    pub fn state() -> ContextState {
        ACTIVE_TENANT
            .try_with(|active| ContextState::Active(active.tenant_id().to_string()))
            .unwrap_or(ContextState::Inactive)
    }

    pub fn is_active() -> bool {
        ACTIVE_TENANT.try_with(|_| ()).is_ok()
    }

    pub fn current() -> Option<ActiveTenant> {
        ACTIVE_TENANT.try_with(Clone::clone).ok()
    }

    pub fn require() -> Result<ActiveTenant, DomainError> {
        Self::current().ok_or(DomainError::NoTenantContext)
    }

    /// Runs `fut` with `active` bound as the task's tenant.
    ///
    /// Nested activation is refused with `TenantContextActive`.
    pub async fn scope<F>(active: ActiveTenant, fut: F) -> Result<F::Output, DomainError>
    where
        F: Future,
    {
        if Self::is_active() {
            return Err(DomainError::TenantContextActive);
        }

        let _release = ReleaseGuard { tenant_id: active.tenant_id().to_string() };
        debug!(tenant_id = %active.tenant_id(), "tenant context activated");
        Ok(ACTIVE_TENANT.scope(active, fut).await)
    }
}

/// Dropped with the scope future on every exit path.
struct ReleaseGuard {
    tenant_id: String,
}

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        debug!(tenant_id = %self.tenant_id, "tenant context released");
    }
}
