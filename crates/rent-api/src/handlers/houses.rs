// ============================================================================
// Rent API - House Handlers (tenant hosts)
// File: crates/rent-api/src/handlers/houses.rs
// ============================================================================

use axum::Extension;
use serde::Deserialize;

use rent_core::services::HouseService;
use rent_core::tenancy::ActiveTenant;
use rent_core::{House, HouseChanges, HouseDetail, HouseFilter, HouseStatistics, HouseSummary, NewHouse};
use rent_shared::Page;

use super::pagination;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::response::{created, ok, ApiResponse, ApiResult, Created, Message};

#[derive(Debug, Deserialize)]
pub struct HouseListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

pub async fn index(
    Extension(active): Extension<ActiveTenant>,
    ApiQuery(query): ApiQuery<HouseListQuery>,
) -> ApiResult<Page<HouseSummary>> {
    let filter = HouseFilter { search: query.search, is_active: query.is_active };
    let page = HouseService::for_tenant(&active)
        .list(&filter, pagination(query.page, query.per_page))
        .await?;
    Ok(ok(page))
}

pub async fn store(
    Extension(active): Extension<ActiveTenant>,
    ApiJson(house): ApiJson<NewHouse>,
) -> Created<House> {
    Ok(created(HouseService::for_tenant(&active).create(house).await?))
}

pub async fn show(Extension(active): Extension<ActiveTenant>, ApiPath(id): ApiPath<i64>) -> ApiResult<HouseDetail> {
    Ok(ok(HouseService::for_tenant(&active).show(id).await?))
}

pub async fn update(
    Extension(active): Extension<ActiveTenant>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(changes): ApiJson<HouseChanges>,
) -> ApiResult<House> {
    Ok(ok(HouseService::for_tenant(&active).update(id, changes).await?))
}

pub async fn destroy(Extension(active): Extension<ActiveTenant>, ApiPath(id): ApiPath<i64>) -> ApiResult<Message> {
    HouseService::for_tenant(&active).delete(id).await?;
    Ok(axum::Json(ApiResponse::message("House deleted successfully")))
}

/// GET /v1/houses/{id}/statistics
pub async fn statistics(
    Extension(active): Extension<ActiveTenant>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<HouseStatistics> {
    Ok(ok(HouseService::for_tenant(&active).statistics(id).await?))
}
