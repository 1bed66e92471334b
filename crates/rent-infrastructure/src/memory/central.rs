// ============================================================================
// Rent Infrastructure - In-Memory Central Repositories
// File: crates/rent-infrastructure/src/memory/central.rs
// Description: Tenant directory, admins and access tokens
// ============================================================================

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::info;
use uuid::Uuid;

use rent_core::domain::{AccessToken, Admin, Identity, Tenant, TenantDomain, TenantFilter, TenantStatus};
use rent_core::error::DomainError;
use rent_core::repositories::{AdminRepository, TenantDirectory, TokenRepository};
use rent_shared::{Page, Pagination};

#[derive(Default)]
struct DirectoryState {
    tenants: BTreeMap<String, Tenant>,
    domains: Vec<TenantDomain>,
}

impl DirectoryState {
    fn with_domains(&self, mut tenant: Tenant) -> Tenant {
        tenant.domains = self
            .domains
            .iter()
            .filter(|d| d.tenant_id == tenant.id)
            .cloned()
            .collect();
        tenant
    }

    fn email_owner(&self, email: &str) -> Option<&str> {
        self.tenants
            .values()
            .find(|t| t.email.eq_ignore_ascii_case(email))
            .map(|t| t.id.as_str())
    }

    fn insert(&mut self, tenant: &Tenant) -> Result<(), DomainError> {
        if self.tenants.contains_key(&tenant.id) {
            return Err(DomainError::conflict("subdomain", tenant.id.clone()));
        }
        if self.email_owner(&tenant.email).is_some() {
            return Err(DomainError::conflict("email", tenant.email.clone()));
        }
        let mut row = tenant.clone();
        row.domains.clear();
        self.tenants.insert(row.id.clone(), row);
        Ok(())
    }
}

/// Central tenant catalog held in process memory.
#[derive(Default)]
pub struct MemoryTenantDirectory {
    state: RwLock<DirectoryState>,
}

impl MemoryTenantDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TenantDirectory for MemoryTenantDirectory {
    async fn create(&self, tenant: &Tenant) -> Result<Tenant, DomainError> {
        let mut state = self.state.write();
        state.insert(tenant)?;
        info!("Tenant created: {}", tenant.id);
        Ok(state.with_domains(tenant.clone()))
    }

    async fn create_with_domain(&self, tenant: &Tenant, domain: &TenantDomain) -> Result<Tenant, DomainError> {
        let mut state = self.state.write();
        // Check the domain before inserting so a conflict leaves nothing behind
        if state.domains.iter().any(|d| d.domain == domain.domain) {
            return Err(DomainError::conflict("subdomain", tenant.id.clone()));
        }
        state.insert(tenant)?;
        state.domains.push(domain.clone());
        info!("Tenant created with domain: {} -> {}", domain.domain, tenant.id);
        Ok(state.with_domains(tenant.clone()))
    }

    async fn find(&self, id: &str) -> Result<Option<Tenant>, DomainError> {
        let state = self.state.read();
        Ok(state.tenants.get(id).cloned().map(|t| state.with_domains(t)))
    }

    async fn find_by_domain(&self, domain: &str) -> Result<Option<Tenant>, DomainError> {
        let state = self.state.read();
        let tenant = state
            .domains
            .iter()
            .find(|d| d.domain == domain)
            .and_then(|d| state.tenants.get(&d.tenant_id))
            .cloned();
        Ok(tenant.map(|t| state.with_domains(t)))
    }

    async fn domain_exists(&self, domain: &str) -> Result<bool, DomainError> {
        Ok(self.state.read().domains.iter().any(|d| d.domain == domain))
    }

    async fn email_taken(&self, email: &str, except: Option<String>) -> Result<bool, DomainError> {
        let state = self.state.read();
        Ok(state
            .email_owner(email)
            .is_some_and(|owner| except.as_deref() != Some(owner)))
    }

    async fn list(&self, filter: &TenantFilter, pagination: Pagination) -> Result<Page<Tenant>, DomainError> {
        let state = self.state.read();
        let mut tenants: Vec<Tenant> = state
            .tenants
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .map(|t| state.with_domains(t))
            .collect();
        tenants.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(Page::from_vec(tenants, pagination))
    }

    async fn update(&self, tenant: &Tenant) -> Result<Tenant, DomainError> {
        let mut state = self.state.write();
        if let Some(owner) = state.email_owner(&tenant.email) {
            if owner != tenant.id {
                return Err(DomainError::conflict("email", tenant.email.clone()));
            }
        }
        let row = state
            .tenants
            .get_mut(&tenant.id)
            .ok_or_else(|| DomainError::not_found("Tenant", &tenant.id))?;
        *row = Tenant { domains: Vec::new(), updated_at: Utc::now(), ..tenant.clone() };
        let row = row.clone();
        Ok(state.with_domains(row))
    }

    async fn update_status(&self, id: &str, status: TenantStatus) -> Result<Tenant, DomainError> {
        let mut state = self.state.write();
        let row = state
            .tenants
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("Tenant", id))?;
        row.status = status;
        row.updated_at = Utc::now();
        let row = row.clone();
        info!("Tenant {} status set to {}", id, status);
        Ok(state.with_domains(row))
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let mut state = self.state.write();
        let removed = state.tenants.remove(id).is_some();
        state.domains.retain(|d| d.tenant_id != id);
        Ok(removed)
    }
}

/// Central administrators keyed by id.
#[derive(Default)]
pub struct MemoryAdminRepository {
    admins: RwLock<HashMap<Uuid, Admin>>,
}

impl MemoryAdminRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdminRepository for MemoryAdminRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Admin>, DomainError> {
        Ok(self.admins.read().get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, DomainError> {
        Ok(self
            .admins
            .read()
            .values()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create(&self, admin: &Admin) -> Result<Admin, DomainError> {
        let mut admins = self.admins.write();
        if admins.values().any(|a| a.email.eq_ignore_ascii_case(&admin.email)) {
            return Err(DomainError::conflict("email", admin.email.clone()));
        }
        admins.insert(admin.id, admin.clone());
        Ok(admin.clone())
    }
}

/// Issued access tokens keyed by digest.
#[derive(Default)]
pub struct MemoryTokenRepository {
    tokens: RwLock<HashMap<String, AccessToken>>,
}

impl MemoryTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.read().is_empty()
    }
}

#[async_trait]
impl TokenRepository for MemoryTokenRepository {
    async fn store(&self, token: &AccessToken) -> Result<(), DomainError> {
        self.tokens.write().insert(token.token_hash.clone(), token.clone());
        Ok(())
    }

    async fn find(&self, token_hash: &str) -> Result<Option<AccessToken>, DomainError> {
        Ok(self.tokens.read().get(token_hash).cloned())
    }

    async fn touch(&self, token_hash: &str) -> Result<(), DomainError> {
        if let Some(token) = self.tokens.write().get_mut(token_hash) {
            token.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn delete(&self, token_hash: &str) -> Result<bool, DomainError> {
        Ok(self.tokens.write().remove(token_hash).is_some())
    }

    async fn delete_for_tenant(&self, tenant_id: &str) -> Result<u64, DomainError> {
        let mut tokens = self.tokens.write();
        let before = tokens.len();
        tokens.retain(|_, t| !matches!(&t.identity, Identity::TenantUser { tenant_id: owner, .. } if owner == tenant_id));
        Ok((before - tokens.len()) as u64)
    }
}
