// ============================================================================
// Rent API - Tenant User Handlers (tenant hosts)
// File: crates/rent-api/src/handlers/tenant_users.rs
// ============================================================================

use axum::Extension;
use serde::Deserialize;

use rent_core::services::TenantUserService;
use rent_core::tenancy::ActiveTenant;
use rent_core::{
    FlatAssignment, NewTenantUser, TenantUser, TenantUserChanges, TenantUserDetail, TenantUserFilter,
    TenantUserStatus,
};
use rent_shared::Page;

use super::pagination;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::response::{created, ok, ApiResponse, ApiResult, Created, Message};

#[derive(Debug, Deserialize)]
pub struct TenantUserListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub flat_id: Option<i64>,
    pub status: Option<TenantUserStatus>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

pub async fn index(
    Extension(active): Extension<ActiveTenant>,
    ApiQuery(query): ApiQuery<TenantUserListQuery>,
) -> ApiResult<Page<TenantUser>> {
    let pagination = pagination(query.page, query.per_page);
    let filter = TenantUserFilter {
        flat_id: query.flat_id,
        status: query.status,
        is_active: query.is_active,
        search: query.search,
    };
    Ok(ok(TenantUserService::for_tenant(&active).list(&filter, pagination).await?))
}

pub async fn store(
    Extension(active): Extension<ActiveTenant>,
    ApiJson(input): ApiJson<NewTenantUser>,
) -> Created<TenantUserDetail> {
    Ok(created(TenantUserService::for_tenant(&active).create(input).await?))
}

pub async fn show(
    Extension(active): Extension<ActiveTenant>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<TenantUserDetail> {
    Ok(ok(TenantUserService::for_tenant(&active).show(id).await?))
}

pub async fn update(
    Extension(active): Extension<ActiveTenant>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(changes): ApiJson<TenantUserChanges>,
) -> ApiResult<TenantUserDetail> {
    Ok(ok(TenantUserService::for_tenant(&active).update(id, changes).await?))
}

pub async fn destroy(Extension(active): Extension<ActiveTenant>, ApiPath(id): ApiPath<i64>) -> ApiResult<Message> {
    TenantUserService::for_tenant(&active).delete(id).await?;
    Ok(axum::Json(ApiResponse::message("Tenant user deleted successfully")))
}

/// POST /v1/tenant-users/{id}/assign-flat
pub async fn assign_flat(
    Extension(active): Extension<ActiveTenant>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(assignment): ApiJson<FlatAssignment>,
) -> ApiResult<TenantUserDetail> {
    Ok(ok(TenantUserService::for_tenant(&active).assign_flat(id, assignment).await?))
}

/// POST /v1/tenant-users/{id}/remove-flat
pub async fn remove_flat(
    Extension(active): Extension<ActiveTenant>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<TenantUserDetail> {
    Ok(ok(TenantUserService::for_tenant(&active).remove_flat(id).await?))
}
