// ============================================================================
// Rent API - Auth Handlers
// File: crates/rent-api/src/handlers/auth.rs
// ============================================================================
//! Login, logout and current-principal handlers for both hosts

use axum::{extract::State, Extension};

use rent_core::services::{AuthSession, LoginResult, TenantUserService};
use rent_core::tenancy::ActiveTenant;
use rent_core::{Admin, Credentials, TenantUserDetail};

use crate::extract::ApiJson;
use crate::response::{ok, ApiResponse, ApiResult, Message};
use crate::state::AppState;

/// POST /v1/admin/login
pub async fn admin_login(
    State(state): State<AppState>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> ApiResult<LoginResult<Admin>> {
    let result = state.auth.admin_login(credentials).await?;
    Ok(ok(result))
}

/// POST /v1/login on a tenant host
pub async fn tenant_login(
    State(state): State<AppState>,
    Extension(active): Extension<ActiveTenant>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> ApiResult<LoginResult<TenantUserDetail>> {
    let result = state.auth.tenant_user_login(&active, credentials).await?;
    Ok(ok(result))
}

/// POST /v1/logout: revokes the presented token only
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
) -> ApiResult<Message> {
    state.auth.logout(&session).await?;
    Ok(axum::Json(ApiResponse::message("Logged out successfully")))
}

/// GET /v1/me on a central host
pub async fn admin_me(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
) -> ApiResult<Admin> {
    let admin_id = session.require_admin()?;
    Ok(ok(state.auth.find_admin(&admin_id).await?))
}

/// GET /v1/me on a tenant host
pub async fn tenant_user_me(
    Extension(active): Extension<ActiveTenant>,
    Extension(session): Extension<AuthSession>,
) -> ApiResult<TenantUserDetail> {
    let user_id = session.require_tenant_user(active.tenant_id())?;
    Ok(ok(TenantUserService::for_tenant(&active).show(user_id).await?))
}
