//! PostgreSQL repository implementations

mod admin_repo_impl;
mod flat_repo_impl;
mod floor_repo_impl;
mod house_repo_impl;
mod store_factory_impl;
mod tenant_directory_impl;
mod tenant_user_repo_impl;
mod token_repo_impl;

pub use admin_repo_impl::PgAdminRepository;
pub use flat_repo_impl::PgFlatRepository;
pub use floor_repo_impl::PgFloorRepository;
pub use house_repo_impl::PgHouseRepository;
pub use store_factory_impl::PgTenantStoreFactory;
pub use tenant_directory_impl::PgTenantDirectory;
pub use tenant_user_repo_impl::PgTenantUserRepository;
pub use token_repo_impl::PgTokenRepository;
