// ============================================================================
// Rent API - Floor Handlers (nested under houses)
// File: crates/rent-api/src/handlers/floors.rs
// ============================================================================

use axum::Extension;
use serde::Deserialize;

use rent_core::services::FloorService;
use rent_core::tenancy::ActiveTenant;
use rent_core::{Floor, FloorChanges, FloorFilter, FloorSummary, FloorWithFlats, NewFloor};

use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::response::{created, ok, ApiResponse, ApiResult, Created, Message};

#[derive(Debug, Deserialize)]
pub struct FloorListQuery {
    pub is_active: Option<bool>,
}

pub async fn index(
    Extension(active): Extension<ActiveTenant>,
    ApiPath(house_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<FloorListQuery>,
) -> ApiResult<Vec<FloorSummary>> {
    let filter = FloorFilter { is_active: query.is_active };
    Ok(ok(FloorService::for_tenant(&active).list(house_id, &filter).await?))
}

pub async fn store(
    Extension(active): Extension<ActiveTenant>,
    ApiPath(house_id): ApiPath<i64>,
    ApiJson(floor): ApiJson<NewFloor>,
) -> Created<Floor> {
    Ok(created(FloorService::for_tenant(&active).create(house_id, floor).await?))
}

pub async fn show(
    Extension(active): Extension<ActiveTenant>,
    ApiPath((house_id, floor_id)): ApiPath<(i64, i64)>,
) -> ApiResult<FloorWithFlats> {
    Ok(ok(FloorService::for_tenant(&active).show(house_id, floor_id).await?))
}

pub async fn update(
    Extension(active): Extension<ActiveTenant>,
    ApiPath((house_id, floor_id)): ApiPath<(i64, i64)>,
    ApiJson(changes): ApiJson<FloorChanges>,
) -> ApiResult<Floor> {
    Ok(ok(FloorService::for_tenant(&active).update(house_id, floor_id, changes).await?))
}

pub async fn destroy(
    Extension(active): Extension<ActiveTenant>,
    ApiPath((house_id, floor_id)): ApiPath<(i64, i64)>,
) -> ApiResult<Message> {
    FloorService::for_tenant(&active).delete(house_id, floor_id).await?;
    Ok(axum::Json(ApiResponse::message("Floor deleted successfully")))
}
