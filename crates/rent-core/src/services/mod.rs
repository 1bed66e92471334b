//! Application services
//!
//! Central services work on the directory; property services are built per
//! request from the active tenant's store.

pub mod auth_service;
pub mod flat_service;
pub mod floor_service;
pub mod house_service;
pub mod provisioner;
pub mod tenant_service;
pub mod tenant_user_service;

pub use auth_service::{AuthService, AuthSession, LoginResult};
pub use flat_service::FlatService;
pub use floor_service::FloorService;
pub use house_service::HouseService;
pub use provisioner::{Registration, TenantProvisioner};
pub use tenant_service::TenantService;
pub use tenant_user_service::TenantUserService;
