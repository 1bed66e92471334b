//! Request middleware

pub mod auth;
pub mod tenancy;

pub use auth::{require_admin, require_tenant_user};
pub use tenancy::{request_host, require_active_tenant, resolve_tenant};
