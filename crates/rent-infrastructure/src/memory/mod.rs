//! In-memory adapters
//!
//! Same observable behavior as the PostgreSQL adapters (ordering, uniqueness
//! conflicts, cascades) without a database. Each tenant gets its own
//! [`MemoryTenantStore`]; nothing is shared between them.

mod central;
mod tenant_store;

pub use central::{MemoryAdminRepository, MemoryTenantDirectory, MemoryTokenRepository};
pub use tenant_store::{MemoryTenantStore, MemoryTenantStoreFactory};
