// ============================================================================
// Rent API - Flat Handlers (tenant hosts)
// File: crates/rent-api/src/handlers/flats.rs
// ============================================================================

use axum::Extension;
use serde::Deserialize;

use rent_core::services::FlatService;
use rent_core::tenancy::ActiveTenant;
use rent_core::{Flat, FlatChanges, FlatDetail, FlatFilter, FlatStatus, FlatStatusUpdate, FlatType, NewFlat};
use rent_shared::Page;

use super::pagination;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::response::{created, ok, ApiResponse, ApiResult, Created, Message};

#[derive(Debug, Deserialize)]
pub struct FlatListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub house_id: Option<i64>,
    pub floor_id: Option<i64>,
    pub status: Option<FlatStatus>,
    #[serde(rename = "type")]
    pub flat_type: Option<FlatType>,
    pub is_furnished: Option<bool>,
    pub min_rent: Option<f64>,
    pub max_rent: Option<f64>,
    pub bedrooms: Option<i32>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AvailableQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub house_id: Option<i64>,
}

pub async fn index(
    Extension(active): Extension<ActiveTenant>,
    ApiQuery(query): ApiQuery<FlatListQuery>,
) -> ApiResult<Page<Flat>> {
    let pagination = pagination(query.page, query.per_page);
    let filter = FlatFilter {
        house_id: query.house_id,
        floor_id: query.floor_id,
        status: query.status,
        flat_type: query.flat_type,
        is_furnished: query.is_furnished,
        min_rent: query.min_rent,
        max_rent: query.max_rent,
        bedrooms: query.bedrooms,
        search: query.search,
    };
    Ok(ok(FlatService::for_tenant(&active).list(&filter, pagination).await?))
}

/// GET /v1/flats/available
pub async fn available(
    Extension(active): Extension<ActiveTenant>,
    ApiQuery(query): ApiQuery<AvailableQuery>,
) -> ApiResult<Page<Flat>> {
    let page = FlatService::for_tenant(&active)
        .available(query.house_id, pagination(query.page, query.per_page))
        .await?;
    Ok(ok(page))
}

pub async fn store(Extension(active): Extension<ActiveTenant>, ApiJson(flat): ApiJson<NewFlat>) -> Created<Flat> {
    Ok(created(FlatService::for_tenant(&active).create(flat).await?))
}

pub async fn show(Extension(active): Extension<ActiveTenant>, ApiPath(id): ApiPath<i64>) -> ApiResult<FlatDetail> {
    Ok(ok(FlatService::for_tenant(&active).show(id).await?))
}

pub async fn update(
    Extension(active): Extension<ActiveTenant>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(changes): ApiJson<FlatChanges>,
) -> ApiResult<Flat> {
    Ok(ok(FlatService::for_tenant(&active).update(id, changes).await?))
}

/// PATCH /v1/flats/{id}/status
pub async fn update_status(
    Extension(active): Extension<ActiveTenant>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<FlatStatusUpdate>,
) -> ApiResult<Flat> {
    Ok(ok(FlatService::for_tenant(&active).update_status(id, body.status).await?))
}

pub async fn destroy(Extension(active): Extension<ActiveTenant>, ApiPath(id): ApiPath<i64>) -> ApiResult<Message> {
    FlatService::for_tenant(&active).delete(id).await?;
    Ok(axum::Json(ApiResponse::message("Flat deleted successfully")))
}
