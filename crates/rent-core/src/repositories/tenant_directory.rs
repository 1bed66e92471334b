//! Tenant directory trait (port)

use async_trait::async_trait;

use rent_shared::{Page, Pagination};

use crate::domain::{Tenant, TenantDomain, TenantFilter, TenantStatus};
use crate::error::DomainError;

/// Central catalog of tenants and their domain bindings.
///
/// Implementations return tenants with their `domains` loaded and map
/// uniqueness violations to [`DomainError::Conflict`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    async fn create(&self, tenant: &Tenant) -> Result<Tenant, DomainError>;

    /// Inserts the tenant row and its domain row atomically.
    async fn create_with_domain(&self, tenant: &Tenant, domain: &TenantDomain) -> Result<Tenant, DomainError>;

    async fn find(&self, id: &str) -> Result<Option<Tenant>, DomainError>;

    /// Exact match on a normalized hostname.
    async fn find_by_domain(&self, domain: &str) -> Result<Option<Tenant>, DomainError>;

    async fn domain_exists(&self, domain: &str) -> Result<bool, DomainError>;

    /// True when another tenant (other than `except`) already uses `email`.
    async fn email_taken(&self, email: &str, except: Option<String>) -> Result<bool, DomainError>;

    async fn list(&self, filter: &TenantFilter, pagination: Pagination) -> Result<Page<Tenant>, DomainError>;

    async fn update(&self, tenant: &Tenant) -> Result<Tenant, DomainError>;

    async fn update_status(&self, id: &str, status: TenantStatus) -> Result<Tenant, DomainError>;

    /// Removes the tenant and its domains. Returns false when nothing was deleted.
    async fn delete(&self, id: &str) -> Result<bool, DomainError>;
}
