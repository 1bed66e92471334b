// ============================================================================
// Rent API - Tenancy Middleware
// File: crates/rent-api/src/middleware/tenancy.rs
// ============================================================================
//! Binds a request to the tenant that owns its host

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
    Extension,
};
use tracing::debug;

use rent_core::tenancy::{ActiveTenant, TenantContext, TenantResolver};
use rent_core::DomainError;

use crate::error::ApiError;
use crate::state::AppState;

/// Host header, falling back to the URI authority.
pub fn request_host(request: &Request) -> Option<String> {
    request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| request.uri().host().map(str::to_string))
}

/// Resolves the tenant, opens its store and runs the rest of the request
/// inside the tenant scope. Suspended tenants still pass; see
/// [`require_active_tenant`].
pub async fn resolve_tenant(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // 1. Host -> tenant (unknown and central hosts are rejected here)
    let host = request_host(&request).unwrap_or_default();
    let tenant = state.resolver.lookup(&host).await?;

    // 2. Store handle for this tenant only
    let active = state.switch.activate(tenant).await?;
    debug!(tenant_id = %active.tenant_id(), host = %host, "request bound to tenant");

    // 3. Explicit handle for handlers, task-local scope for everything below
    request.extensions_mut().insert(active.clone());
    let response = TenantContext::scope(active, next.run(request)).await?;
    Ok(response)
}

/// Rejects requests for suspended or inactive tenants.
pub async fn require_active_tenant(
    Extension(active): Extension<ActiveTenant>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    TenantResolver::ensure_active(active.tenant()).map_err(DomainError::from)?;
    Ok(next.run(request).await)
}
