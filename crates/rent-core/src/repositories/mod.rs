//! Repository traits (ports)
//!
//! Central ports (directory, admins, tokens) never see tenant data; tenant
//! ports are only ever reached through a [`TenantStore`] handed out by the
//! store registry.

pub mod admin_repository;
pub mod property;
pub mod store;
pub mod tenant_directory;
pub mod token_repository;

pub use admin_repository::AdminRepository;
pub use property::{FlatRepository, FloorRepository, HouseRepository, TenantUserRepository};
pub use store::{TenantStore, TenantStoreFactory};
pub use tenant_directory::TenantDirectory;
pub use token_repository::TokenRepository;

#[cfg(test)]
pub use admin_repository::MockAdminRepository;
#[cfg(test)]
pub use property::{MockFlatRepository, MockFloorRepository, MockHouseRepository, MockTenantUserRepository};
#[cfg(test)]
pub use store::MockTenantStoreFactory;
#[cfg(test)]
pub use tenant_directory::MockTenantDirectory;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
