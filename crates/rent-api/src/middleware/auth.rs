// ============================================================================
// Rent API - Authentication Middleware
// File: crates/rent-api/src/middleware/auth.rs
// ============================================================================
//! Bearer token authentication for central and tenant routes

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
    Extension,
};
use tracing::debug;

use rent_core::services::AuthSession;
use rent_core::tenancy::ActiveTenant;
use rent_core::DomainError;
use rent_security::AccessTokenService;

use crate::error::ApiError;
use crate::state::AppState;

fn bearer_token(headers: &HeaderMap) -> Result<String, DomainError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(AccessTokenService::parse_bearer)
        .map(str::to_string)
        .ok_or(DomainError::Unauthorized)
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthSession, DomainError> {
    let token = bearer_token(headers)?;
    state.auth.authenticate(&token).await
}

/// Central routes: admin tokens only.
pub async fn require_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = authenticate(&state, &headers).await?;
    let admin_id = session.require_admin()?;
    debug!(admin_id = %admin_id, "admin authenticated");

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

/// Tenant routes: tokens issued to a user of this very tenant.
pub async fn require_tenant_user(
    State(state): State<AppState>,
    Extension(active): Extension<ActiveTenant>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = authenticate(&state, &headers).await?;
    let user_id = session.require_tenant_user(active.tenant_id())?;
    debug!(tenant_id = %active.tenant_id(), user_id, "tenant user authenticated");

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}
