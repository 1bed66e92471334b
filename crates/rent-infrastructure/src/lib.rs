//! # Rent Infrastructure
//!
//! Storage adapters for the core ports: PostgreSQL (central tables plus one
//! schema per tenant) and an in-memory backend with the same semantics.

pub mod database;
pub mod memory;

pub use database::{
    bootstrap_central_schema, create_pool, PgAdminRepository, PgTenantDirectory,
    PgTenantStoreFactory, PgTokenRepository,
};
pub use memory::{
    MemoryAdminRepository, MemoryTenantDirectory, MemoryTenantStore, MemoryTenantStoreFactory,
    MemoryTokenRepository,
};
