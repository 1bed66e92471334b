//! Central tenant administration: listing, profile updates and status toggles

use std::sync::Arc;

use tracing::info;
use validator::Validate;

use rent_shared::{Page, Pagination};

use crate::domain::{Tenant, TenantChanges, TenantFilter, TenantStatus};
use crate::error::DomainError;
use crate::repositories::TenantDirectory;

pub struct TenantService {
    directory: Arc<dyn TenantDirectory>,
}

impl TenantService {
    pub fn new(directory: Arc<dyn TenantDirectory>) -> Self {
        Self { directory }
    }

    pub async fn list(&self, filter: &TenantFilter, pagination: Pagination) -> Result<Page<Tenant>, DomainError> {
        self.directory.list(filter, pagination.normalized()).await
    }

    pub async fn show(&self, id: &str) -> Result<Tenant, DomainError> {
        self.directory
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Tenant", id))
    }

    pub async fn update(&self, id: &str, changes: TenantChanges) -> Result<Tenant, DomainError> {
        changes.validate()?;
        let mut tenant = self.show(id).await?;

        if let Some(email) = changes.email.as_deref() {
            let email = email.trim().to_lowercase();
            if self.directory.email_taken(&email, Some(tenant.id.clone())).await? {
                return Err(DomainError::conflict("email", email));
            }
        }

        tenant.apply(changes);
        let updated = self.directory.update(&tenant).await?;
        info!(tenant_id = %updated.id, status = %updated.status, "Tenant updated");
        Ok(updated)
    }

    pub async fn suspend(&self, id: &str) -> Result<Tenant, DomainError> {
        self.set_status(id, TenantStatus::Suspended).await
    }

    pub async fn activate(&self, id: &str) -> Result<Tenant, DomainError> {
        self.set_status(id, TenantStatus::Active).await
    }

    async fn set_status(&self, id: &str, status: TenantStatus) -> Result<Tenant, DomainError> {
        let tenant = self.directory.update_status(id, status).await?;
        info!(tenant_id = %tenant.id, status = %status, "Tenant status changed");
        Ok(tenant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TenantAttributes;
    use crate::repositories::MockTenantDirectory;

    fn acme() -> Tenant {
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
    }

    #[tokio::test]
    async fn test_update_rejects_email_of_another_tenant() {
        let mut directory = MockTenantDirectory::new();
        directory.expect_find().returning(|_| Ok(Some(acme())));
        directory
            .expect_email_taken()
            .withf(|email, except| email == "b@beta.test" && except.as_deref() == Some("acme"))
            .returning(|_, _| Ok(true));
        directory.expect_update().never();

        let service = TenantService::new(Arc::new(directory));
        let err = service
            .update("acme", TenantChanges { email: Some("B@beta.test".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { field: "email", .. }));
    }

    #[tokio::test]
    async fn test_show_missing_tenant_is_not_found() {
        let mut directory = MockTenantDirectory::new();
        directory.expect_find().returning(|_| Ok(None));

        let service = TenantService::new(Arc::new(directory));
        assert!(matches!(service.show("ghost").await, Err(DomainError::NotFound { .. })));
    }
}
