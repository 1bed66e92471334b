//! # Tenancy
//!
//! Host resolution, the per-task tenant context and the store registry that
//! backs it.

pub mod context;
pub mod registry;
pub mod resolver;
pub mod switch;

pub use context::{ActiveTenant, ContextState, TenantContext};
pub use registry::StoreRegistry;
pub use resolver::{Rejection, TenantResolver};
pub use switch::TenantSwitch;
