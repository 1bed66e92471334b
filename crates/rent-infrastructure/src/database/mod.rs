//! Database module (PostgreSQL adapters)

pub mod connection;
pub mod errors;
pub mod postgres;
pub mod schema;

pub use connection::{create_pool, tenant_pool};
pub use postgres::{
    PgAdminRepository, PgFlatRepository, PgFloorRepository, PgHouseRepository, PgTenantDirectory,
    PgTenantStoreFactory, PgTenantUserRepository, PgTokenRepository,
};
pub use schema::bootstrap_central_schema;
