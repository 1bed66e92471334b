// ============================================================================
// Rent Core - Tenant Resolver
// File: crates/rent-core/src/tenancy/resolver.rs
// Description: Maps an inbound host to a tenant record
// ============================================================================

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use rent_shared::utils::normalize_host;

use crate::domain::{Tenant, TenantStatus};
use crate::error::DomainError;
use crate::repositories::TenantDirectory;

/// Why a host could not be served as a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    #[error("This domain is not registered to any tenant")]
    UnknownTenant,
    #[error("Tenant is {0}")]
    TenantInactive(TenantStatus),
    #[error("Central domains do not serve tenant routes")]
    CentralDomain,
}

impl Rejection {
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::UnknownTenant => "UNKNOWN_TENANT",
            Rejection::TenantInactive(_) => "TENANT_INACTIVE",
            Rejection::CentralDomain => "CENTRAL_DOMAIN",
        }
    }
}

/// Exact-match host lookup against the directory. No wildcard, suffix or
/// default tenant.
pub struct TenantResolver {
    directory: Arc<dyn TenantDirectory>,
    central_domains: HashSet<String>,
}

impl TenantResolver {
    pub fn new<I, S>(directory: Arc<dyn TenantDirectory>, central_domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            directory,
            central_domains: central_domains
                .into_iter()
                .map(|d| normalize_host(d.as_ref()))
                .collect(),
        }
    }

    pub fn is_central(&self, host: &str) -> bool {
        self.central_domains.contains(&normalize_host(host))
    }

    /// Finds the tenant bound to `host` regardless of its status.
    pub async fn lookup(&self, host: &str) -> Result<Tenant, DomainError> {
        let host = normalize_host(host);
        if self.central_domains.contains(&host) {
            debug!(host = %host, "central domain rejected for tenant routes");
            return Err(Rejection::CentralDomain.into());
        }

        match self.directory.find_by_domain(&host).await? {
            Some(tenant) => Ok(tenant),
            None => {
                warn!(host = %host, "no tenant bound to domain");
                Err(Rejection::UnknownTenant.into())
            }
        }
    }

    pub fn ensure_active(tenant: &Tenant) -> Result<(), Rejection> {
        match tenant.status {
            TenantStatus::Active => Ok(()),
            status => {
                warn!(tenant_id = %tenant.id, status = %status, "inactive tenant rejected");
                Err(Rejection::TenantInactive(status))
            }
        }
    }

    /// Lookup followed by the status check.
    pub async fn resolve(&self, host: &str) -> Result<Tenant, DomainError> {
        let tenant = self.lookup(host).await?;
        Self::ensure_active(&tenant)?;
        Ok(tenant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TenantAttributes;
    use crate::repositories::MockTenantDirectory;
    use mockall::predicate::eq;

    fn tenant(status: TenantStatus) -> Tenant {
        Tenant::new(
            "acme",
            TenantAttributes {
                name: "Acme".into(),
                email: "a@acme.test".into(),
                phone: None,
                address: None,
                owner_name: "Ann".into(),
            },
        )
        .with_status(status)
    }

    fn resolver(directory: MockTenantDirectory) -> TenantResolver {
        TenantResolver::new(Arc::new(directory), ["localhost", "houserent.test"])
    }

    #[tokio::test]
    async fn test_resolves_active_tenant_with_port_and_case() {
        let mut directory = MockTenantDirectory::new();
        directory
            .expect_find_by_domain()
            .with(eq("acme.houserent.test"))
            .returning(|_| Ok(Some(tenant(TenantStatus::Active))));

        let found = resolver(directory).resolve("ACME.houserent.test:8080").await.unwrap();
        assert_eq!(found.id, "acme");
    }

    #[tokio::test]
    async fn test_unknown_host_rejected() {
        let mut directory = MockTenantDirectory::new();
        directory.expect_find_by_domain().returning(|_| Ok(None));

        let err = resolver(directory).resolve("nobody.houserent.test").await.unwrap_err();
        assert!(matches!(err, DomainError::TenantRejected(Rejection::UnknownTenant)));
    }

    #[tokio::test]
    async fn test_central_domain_never_hits_directory() {
        let mut directory = MockTenantDirectory::new();
        directory.expect_find_by_domain().never();

        let err = resolver(directory).lookup("houserent.test.").await.unwrap_err();
        assert!(matches!(err, DomainError::TenantRejected(Rejection::CentralDomain)));
    }

    #[tokio::test]
    async fn test_suspended_tenant_found_by_lookup_but_not_resolved() {
        let mut directory = MockTenantDirectory::new();
        directory
            .expect_find_by_domain()
            .times(2)
            .returning(|_| Ok(Some(tenant(TenantStatus::Suspended))));
        let resolver = resolver(directory);

        assert!(resolver.lookup("acme.houserent.test").await.is_ok());
        let err = resolver.resolve("acme.houserent.test").await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::TenantRejected(Rejection::TenantInactive(TenantStatus::Suspended))
        ));
    }
}
