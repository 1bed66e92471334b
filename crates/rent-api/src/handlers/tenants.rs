// ============================================================================
// Rent API - Tenant Management Handlers (central hosts)
// File: crates/rent-api/src/handlers/tenants.rs
// ============================================================================

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use rent_core::services::Registration;
use rent_core::{Tenant, TenantAttributes, TenantChanges, TenantFilter, TenantStatus};
use rent_shared::Page;

use super::pagination;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::response::{created, ok, ApiResponse, ApiResult, Created, Message};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TenantListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<TenantStatus>,
    pub search: Option<String>,
}

/// Registration payload. `owner_password`, when given, seeds the tenant's
/// first user (the owner) so the new host can be logged into.
#[derive(Debug, Deserialize)]
pub struct RegisterTenantRequest {
    pub subdomain: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub owner_name: String,
    pub owner_password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProvisionRequest {
    pub owner_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteTenantQuery {
    #[serde(default)]
    pub purge_store: bool,
}

/// GET /v1/tenants
pub async fn index(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TenantListQuery>,
) -> ApiResult<Page<Tenant>> {
    let filter = TenantFilter { status: query.status, search: query.search };
    let page = state.tenants.list(&filter, pagination(query.page, query.per_page)).await?;
    Ok(ok(page))
}

/// POST /v1/tenants
pub async fn store(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterTenantRequest>,
) -> Created<Registration> {
    let attrs = TenantAttributes {
        name: request.name,
        email: request.email,
        phone: request.phone,
        address: request.address,
        owner_name: request.owner_name,
    };
    let registration = state
        .provisioner
        .register(&request.subdomain, attrs, request.owner_password)
        .await?;
    Ok(created(registration))
}

/// GET /v1/tenants/{id}
pub async fn show(State(state): State<AppState>, ApiPath(id): ApiPath<String>) -> ApiResult<Tenant> {
    Ok(ok(state.tenants.show(&id).await?))
}

/// PUT /v1/tenants/{id}
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(changes): ApiJson<TenantChanges>,
) -> ApiResult<Tenant> {
    Ok(ok(state.tenants.update(&id, changes).await?))
}

/// DELETE /v1/tenants/{id}?purge_store=true
pub async fn destroy(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiQuery(query): ApiQuery<DeleteTenantQuery>,
) -> ApiResult<Message> {
    state.provisioner.deprovision(&id, query.purge_store).await?;
    Ok(axum::Json(ApiResponse::message("Tenant deleted successfully")))
}

/// POST /v1/tenants/{id}/suspend
pub async fn suspend(State(state): State<AppState>, ApiPath(id): ApiPath<String>) -> ApiResult<Tenant> {
    Ok(ok(state.tenants.suspend(&id).await?))
}

/// POST /v1/tenants/{id}/activate
pub async fn activate(State(state): State<AppState>, ApiPath(id): ApiPath<String>) -> ApiResult<Tenant> {
    Ok(ok(state.tenants.activate(&id).await?))
}

/// POST /v1/tenants/{id}/provision: re-applies the store schema.
///
/// The body is optional; `{"owner_password": ...}` also seeds a missing owner.
pub async fn provision(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    body: Bytes,
) -> ApiResult<Tenant> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        ProvisionRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest {
            status: StatusCode::BAD_REQUEST,
            message: e.to_string(),
        })?
    };
    Ok(ok(state.provisioner.reprovision(&id, request.owner_password).await?))
}
