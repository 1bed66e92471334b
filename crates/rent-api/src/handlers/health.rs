use axum::{extract::State, Extension, Json};
use chrono::Utc;
use serde::Serialize;

use rent_core::tenancy::ActiveTenant;
use rent_core::TenantStatus;

use crate::response::{ok, ApiResponse};
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: String,
    version: &'static str,
    timestamp: String,
}

#[derive(Serialize)]
pub struct TenantHealthResponse {
    status: &'static str,
    tenant_id: String,
    domain: Option<String>,
    tenant_status: TenantStatus,
}

/// GET /health on a central host
pub async fn central(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse {
        status: "ok",
        service: state.service_name,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// GET /health on a tenant host. Answers for suspended tenants too.
pub async fn tenant(Extension(active): Extension<ActiveTenant>) -> Json<ApiResponse<TenantHealthResponse>> {
    let tenant = active.tenant();
    ok(TenantHealthResponse {
        status: "ok",
        tenant_id: tenant.id.clone(),
        domain: tenant.domains.first().map(|d| d.domain.clone()),
        tenant_status: tenant.status,
    })
}
