// ============================================================================
// Rent API - Router
// File: crates/rent-api/src/router.rs
// Description: Central and tenant route tables behind a Host dispatcher
// ============================================================================

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    response::Response,
    routing::{get, patch, post},
    Router,
};
use tower::ServiceExt;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::debug;

use crate::handlers::{self, auth, flats, floors, health, houses, tenant_users, tenants};
use crate::middleware::{request_host, require_active_tenant, require_admin, require_tenant_user, resolve_tenant};
use crate::state::AppState;

/// Picks the route table from the request host.
struct HostDispatch {
    state: AppState,
    central: Router,
    tenant: Router,
}

async fn dispatch(State(hosts): State<Arc<HostDispatch>>, request: Request) -> Response {
    let host = request_host(&request).unwrap_or_default();
    let router = if hosts.state.resolver.is_central(&host) {
        debug!(host = %host, "central request");
        hosts.central.clone()
    } else {
        hosts.tenant.clone()
    };

    match router.oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    }
}

/// Administrative routes served on the configured central hostnames.
fn central_routes(state: AppState) -> Router {
    let protected = Router::new()
        .route("/v1/logout", post(auth::logout))
        .route("/v1/me", get(auth::admin_me))
        .route("/v1/tenants", get(tenants::index).post(tenants::store))
        .route(
            "/v1/tenants/{id}",
            get(tenants::show).put(tenants::update).delete(tenants::destroy),
        )
        .route("/v1/tenants/{id}/suspend", post(tenants::suspend))
        .route("/v1/tenants/{id}/activate", post(tenants::activate))
        .route("/v1/tenants/{id}/provision", post(tenants::provision))
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/health", get(health::central))
        .route("/v1/admin/login", post(auth::admin_login))
        .merge(protected)
        .fallback(handlers::fallback)
        .with_state(state)
}

/// Property routes served on every tenant domain.
///
/// Every request is bound to its tenant first. `/health` stops there, login
/// additionally needs an active tenant, and the rest also need a token issued
/// to one of this tenant's users.
fn tenant_routes(state: AppState) -> Router {
    let protected = Router::new()
        .route("/v1/logout", post(auth::logout))
        .route("/v1/me", get(auth::tenant_user_me))
        // Houses and nested floors
        .route("/v1/houses", get(houses::index).post(houses::store))
        .route(
            "/v1/houses/{id}",
            get(houses::show).put(houses::update).delete(houses::destroy),
        )
        .route("/v1/houses/{id}/statistics", get(houses::statistics))
        .route("/v1/houses/{id}/floors", get(floors::index).post(floors::store))
        .route(
            "/v1/houses/{id}/floors/{floor_id}",
            get(floors::show).put(floors::update).delete(floors::destroy),
        )
        // Flats
        .route("/v1/flats", get(flats::index).post(flats::store))
        .route("/v1/flats/available", get(flats::available))
        .route(
            "/v1/flats/{id}",
            get(flats::show).put(flats::update).delete(flats::destroy),
        )
        .route("/v1/flats/{id}/status", patch(flats::update_status))
        // Tenant users
        .route(
            "/v1/tenant-users",
            get(tenant_users::index).post(tenant_users::store),
        )
        .route(
            "/v1/tenant-users/{id}",
            get(tenant_users::show)
                .put(tenant_users::update)
                .delete(tenant_users::destroy),
        )
        .route("/v1/tenant-users/{id}/assign-flat", post(tenant_users::assign_flat))
        .route("/v1/tenant-users/{id}/remove-flat", post(tenant_users::remove_flat))
        .route_layer(from_fn_with_state(state.clone(), require_tenant_user));

    let gated = Router::new()
        .route("/v1/login", post(auth::tenant_login))
        .merge(protected)
        .route_layer(from_fn(require_active_tenant));

    Router::new()
        .route("/health", get(health::tenant))
        .merge(gated)
        .fallback(handlers::fallback)
        .layer(from_fn_with_state(state.clone(), resolve_tenant))
        .with_state(state)
}

pub fn build_router(state: AppState) -> Router {
    let timeout = state.request_timeout;
    let hosts = Arc::new(HostDispatch {
        central: central_routes(state.clone()),
        tenant: tenant_routes(state.clone()),
        state,
    });

    Router::new()
        .fallback(dispatch)
        .with_state(hosts)
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
        .layer(CatchPanicLayer::new())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default().include_headers(false)))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
