//! Shared application state

use std::sync::Arc;
use std::time::Duration;

use rent_core::repositories::{AdminRepository, TenantDirectory, TenantStoreFactory, TokenRepository};
use rent_core::services::{AuthService, TenantProvisioner, TenantService};
use rent_core::tenancy::{StoreRegistry, TenantResolver, TenantSwitch};
use rent_shared::config::AppConfig;

/// Storage adapters the state is wired from.
pub struct Backends {
    pub directory: Arc<dyn TenantDirectory>,
    pub admins: Arc<dyn AdminRepository>,
    pub tokens: Arc<dyn TokenRepository>,
    pub stores: Arc<dyn TenantStoreFactory>,
}

#[derive(Clone)]
pub struct AppState {
    pub service_name: String,
    pub request_timeout: Duration,
    pub resolver: Arc<TenantResolver>,
    pub switch: Arc<TenantSwitch>,
    pub provisioner: Arc<TenantProvisioner>,
    pub tenants: Arc<TenantService>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(backends: Backends, config: &AppConfig) -> Self {
        let registry = Arc::new(StoreRegistry::new(backends.stores));

        Self {
            service_name: config.app.name.clone(),
            request_timeout: Duration::from_secs(config.app.request_timeout_secs),
            resolver: Arc::new(TenantResolver::new(
                backends.directory.clone(),
                &config.tenancy.central_domains,
            )),
            switch: Arc::new(TenantSwitch::new(registry.clone())),
            provisioner: Arc::new(TenantProvisioner::new(
                backends.directory.clone(),
                registry,
                backends.tokens.clone(),
                config.tenancy.base_domain.clone(),
            )),
            tenants: Arc::new(TenantService::new(backends.directory)),
            auth: Arc::new(AuthService::new(backends.admins, backends.tokens)),
        }
    }
}
