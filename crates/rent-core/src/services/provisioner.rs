// ============================================================================
// Rent Core - Tenant Provisioner
// File: crates/rent-core/src/services/provisioner.rs
// Description: Registers tenants, binds their domain and builds their store
// ============================================================================

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};
use validator::Validate;

use rent_shared::constants::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};

use crate::domain::{NewTenantUser, Tenant, TenantAttributes, TenantDomain, TenantUserStatus};
use crate::error::DomainError;
use crate::repositories::{TenantDirectory, TokenRepository};
use crate::tenancy::StoreRegistry;

use super::TenantUserService;

/// Outcome of a successful registration.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub tenant: Tenant,
    pub access_url: String,
}

fn check_owner_password(password: Option<&str>) -> Result<(), DomainError> {
    let Some(password) = password else {
        return Ok(());
    };
    let length = password.chars().count();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
        return Err(DomainError::invalid(
            "owner_password",
            "The owner password must be between 8 and 128 characters",
        ));
    }
    Ok(())
}

fn incomplete(tenant_id: &str, e: DomainError) -> DomainError {
    match e {
        already @ DomainError::ProvisioningIncomplete { .. } => already,
        other => DomainError::ProvisioningIncomplete {
            tenant_id: tenant_id.to_string(),
            reason: other.to_string(),
        },
    }
}

pub struct TenantProvisioner {
    directory: Arc<dyn TenantDirectory>,
    registry: Arc<StoreRegistry>,
    tokens: Arc<dyn TokenRepository>,
    base_domain: String,
}

impl TenantProvisioner {
    pub fn new(
        directory: Arc<dyn TenantDirectory>,
        registry: Arc<StoreRegistry>,
        tokens: Arc<dyn TokenRepository>,
        base_domain: impl Into<String>,
    ) -> Self {
        Self {
            directory,
            registry,
            tokens,
            base_domain: base_domain.into().trim_matches('.').to_lowercase(),
        }
    }

    pub fn domain_for(&self, slug: &str) -> String {
        format!("{}.{}", slug, self.base_domain)
    }

    /// Registers a tenant under `{slug}.{base_domain}`, provisions its store and,
    /// when `owner_password` is given, seeds the owner as the first tenant user.
    ///
    /// Directory rows are committed before the store is built. A failure in the
    /// store or the owner seed leaves them in place and surfaces
    /// `ProvisioningIncomplete`; `reprovision` finishes the job.
    pub async fn register(
        &self,
        slug: &str,
        attrs: TenantAttributes,
        owner_password: Option<String>,
    ) -> Result<Registration, DomainError> {
        // 1. Field, slug and owner password validation
        attrs.validate()?;
        let slug = slug.trim();
        if !Tenant::is_valid_slug(slug) {
            return Err(DomainError::InvalidSlug(slug.to_string()));
        }
        check_owner_password(owner_password.as_deref())?;

        // 2. Subdomain must be free, including stores kept from removed tenants
        let domain = self.domain_for(slug);
        if self.directory.find(slug).await?.is_some() || self.directory.domain_exists(&domain).await? {
            warn!(slug, "Registration rejected: subdomain taken");
            return Err(DomainError::conflict("subdomain", slug));
        }
        if self.registry.store_exists(slug).await? {
            warn!(slug, "Registration rejected: a retained store still holds this subdomain");
            return Err(DomainError::conflict("subdomain", slug));
        }

        // 3. Email must be free
        let tenant = Tenant::new(slug, attrs);
        if self.directory.email_taken(&tenant.email, None).await? {
            warn!(slug, "Registration rejected: email taken");
            return Err(DomainError::conflict("email", tenant.email.clone()));
        }

        // 4. Tenant + domain rows in one transaction
        let binding = TenantDomain::new(&domain, slug);
        let tenant = self.directory.create_with_domain(&tenant, &binding).await?;
        info!(tenant_id = %tenant.id, domain = %domain, "Tenant registered");

        // 5. Isolated store and its owner account
        self.build_store(&tenant.id).await?;
        if let Some(password) = owner_password {
            self.seed_owner(&tenant, password).await?;
        }

        Ok(Registration {
            access_url: format!("https://{}", domain),
            tenant,
        })
    }

    /// Re-applies the store schema for an existing tenant and seeds the owner
    /// account if a password is given and the owner does not exist yet.
    pub async fn reprovision(&self, tenant_id: &str, owner_password: Option<String>) -> Result<Tenant, DomainError> {
        check_owner_password(owner_password.as_deref())?;
        let tenant = self
            .directory
            .find(tenant_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Tenant", tenant_id))?;
        self.registry.evict(&tenant.id);
        self.build_store(&tenant.id).await?;
        if let Some(password) = owner_password {
            self.seed_owner(&tenant, password).await?;
        }
        Ok(tenant)
    }

    /// Removes the tenant's directory rows and tokens. The store is dropped
    /// only when `purge_store` is set; a retained store keeps its subdomain
    /// reserved.
    pub async fn deprovision(&self, tenant_id: &str, purge_store: bool) -> Result<(), DomainError> {
        if !self.directory.delete(tenant_id).await? {
            return Err(DomainError::not_found("Tenant", tenant_id));
        }

        let revoked = self.tokens.delete_for_tenant(tenant_id).await?;
        self.registry.evict(tenant_id);
        info!(tenant_id, revoked, "Tenant removed from directory");

        if purge_store {
            self.registry.destroy(tenant_id).await?;
        }
        Ok(())
    }

    async fn build_store(&self, tenant_id: &str) -> Result<(), DomainError> {
        self.registry.provision(tenant_id).await.map_err(|e| {
            error!(tenant_id, "Tenant store provisioning failed: {}", e);
            incomplete(tenant_id, e)
        })
    }

    /// Creates the owner as the store's first user. An owner already present
    /// under the tenant email is left as is.
    async fn seed_owner(&self, tenant: &Tenant, password: String) -> Result<(), DomainError> {
        let seeded: Result<bool, DomainError> = async {
            let store = self.registry.acquire(&tenant.id).await?;
            if store.users.find_by_email(&tenant.email).await?.is_some() {
                return Ok(false);
            }
            let owner = NewTenantUser {
                name: tenant.owner_name.clone(),
                email: tenant.email.clone(),
                password,
                phone: tenant.phone.clone(),
                flat_id: None,
                lease_start: None,
                lease_end: None,
                monthly_rent: None,
                security_deposit_paid: None,
                emergency_contact: None,
                documents: None,
                status: TenantUserStatus::Active,
                is_active: true,
            };
            TenantUserService::new(store).create(owner).await?;
            Ok::<_, DomainError>(true)
        }
        .await;

        match seeded {
            Ok(true) => {
                info!(tenant_id = %tenant.id, "Owner account seeded");
                Ok(())
            }
            Ok(false) => Ok(()),
            Err(e) => {
                error!(tenant_id = %tenant.id, "Owner account seeding failed: {}", e);
                Err(incomplete(&tenant.id, e))
            }
        }
    }
}
