//! End-to-end HTTP flows over the in-memory backend.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use rent_api::{build_router, AppState, Backends};
use rent_infrastructure::{
    MemoryAdminRepository, MemoryTenantDirectory, MemoryTenantStoreFactory, MemoryTokenRepository,
};
use rent_shared::config::AppConfig;

const CENTRAL: &str = "localhost";
const ACME: &str = "acme.houserent.test";
const BETA: &str = "beta.houserent.test";
const OWNER_PASSWORD: &str = "owner-secret-1";

async fn app() -> Router {
    let config = AppConfig::default_config().unwrap();
    let backends = Backends {
        directory: Arc::new(MemoryTenantDirectory::new()),
        admins: Arc::new(MemoryAdminRepository::new()),
        tokens: Arc::new(MemoryTokenRepository::new()),
        stores: Arc::new(MemoryTenantStoreFactory::new()),
    };
    let state = AppState::new(backends, &config);
    state
        .auth
        .bootstrap_admin("Super Admin", "admin@houserent.test", "admin-secret-1")
        .await
        .unwrap();
    build_router(state)
}

async fn send(app: &Router, method: Method, host: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri).header(header::HOST, host);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, json)
}

async fn admin_token(app: &Router) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        CENTRAL,
        "/v1/admin/login",
        None,
        Some(json!({"email": "admin@houserent.test", "password": "admin-secret-1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["type"], "admin");
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn register(app: &Router, admin: &str, subdomain: &str, email: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        CENTRAL,
        "/v1/tenants",
        Some(admin),
        Some(json!({
            "subdomain": subdomain,
            "name": "Acme Rentals",
            "email": email,
            "owner_name": "Alice Owner",
            "owner_password": OWNER_PASSWORD,
        })),
    )
    .await
}

async fn tenant_token(app: &Router, host: &str, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        host,
        "/v1/login",
        None,
        Some(json!({"email": email, "password": OWNER_PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_central_health_and_unknown_route() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, CENTRAL, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");

    let (status, body) = send(&app, Method::GET, CENTRAL, "/v1/nothing-here", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_admin_routes_require_token() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, CENTRAL, "/v1/tenants", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHENTICATED");

    let (status, body) = send(
        &app,
        Method::POST,
        CENTRAL,
        "/v1/admin/login",
        None,
        Some(json!({"email": "admin@houserent.test", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["fields"]["email"].is_array());
}

#[tokio::test]
async fn test_register_login_and_manage_property() {
    let app = app().await;
    let admin = admin_token(&app).await;

    // Registration
    let (status, body) = register(&app, &admin, "acme", "owner@acme.test").await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["tenant"]["id"], "acme");
    assert_eq!(body["data"]["access_url"], "https://acme.houserent.test");

    let (status, body) = send(&app, Method::GET, CENTRAL, "/v1/tenants", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);

    // Owner logs in on the tenant host
    let token = tenant_token(&app, ACME, "owner@acme.test").await;
    let (status, body) = send(&app, Method::GET, ACME, "/v1/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "owner@acme.test");

    // House -> floor -> flat
    let (status, body) = send(
        &app,
        Method::POST,
        ACME,
        "/v1/houses",
        Some(&token),
        Some(json!({
            "name": "Sunset Villa",
            "address": "1 Main St",
            "city": "Springfield",
            "state": "IL",
            "zip_code": "62701",
            "total_floors": 2,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let house_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        ACME,
        &format!("/v1/houses/{}/floors", house_id),
        Some(&token),
        Some(json!({"floor_number": 1, "name": "Ground"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let floor_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        ACME,
        "/v1/flats",
        Some(&token),
        Some(json!({
            "house_id": house_id,
            "floor_id": floor_id,
            "flat_number": "101",
            "type": "2bhk",
            "bedrooms": 2,
            "bathrooms": 1,
            "rent_amount": 1500.0,
            "security_deposit": 3000.0,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["status"], "available");
    let flat_id = body["data"]["id"].as_i64().unwrap();

    // Duplicate flat number on the same floor
    let (status, body) = send(
        &app,
        Method::POST,
        ACME,
        "/v1/flats",
        Some(&token),
        Some(json!({
            "house_id": house_id,
            "floor_id": floor_id,
            "flat_number": "101",
            "type": "studio",
            "bedrooms": 0,
            "bathrooms": 1,
            "rent_amount": 900.0,
            "security_deposit": 900.0,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["fields"]["flat_number"].is_array());

    let (status, body) = send(&app, Method::GET, ACME, "/v1/flats/available", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);

    let (status, body) = send(
        &app,
        Method::PATCH,
        ACME,
        &format!("/v1/flats/{}/status", flat_id),
        Some(&token),
        Some(json!({"status": "maintenance"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "maintenance");

    let (_, body) = send(&app, Method::GET, ACME, "/v1/flats/available", Some(&token), None).await;
    assert_eq!(body["data"]["total"], 0);

    let (status, body) = send(
        &app,
        Method::GET,
        ACME,
        &format!("/v1/houses/{}/statistics", house_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_flats"], 1);

    let (status, body) = send(&app, Method::GET, ACME, "/v1/houses/9999", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    // Logout revokes the presented token
    let (status, _) = send(&app, Method::POST, ACME, "/v1/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, ACME, "/v1/houses", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_duplicate_email_leaves_no_tenant_behind() {
    let app = app().await;
    let admin = admin_token(&app).await;

    let (status, _) = register(&app, &admin, "acme", "owner@acme.test").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = register(&app, &admin, "beta", "owner@acme.test").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "CONFLICT");
    assert!(body["error"]["fields"]["email"].is_array());

    let (status, body) = send(&app, Method::GET, BETA, "/health", None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "UNKNOWN_TENANT");
}

#[tokio::test]
async fn test_duplicate_subdomain_keeps_first_registration() {
    let app = app().await;
    let admin = admin_token(&app).await;

    let (status, _) = register(&app, &admin, "acme", "owner@acme.test").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = register(&app, &admin, "acme", "other@acme.test").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "CONFLICT");
    assert!(body["error"]["fields"]["subdomain"].is_array());

    let (status, body) = send(&app, Method::GET, CENTRAL, "/v1/tenants/acme", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "owner@acme.test");
    tenant_token(&app, ACME, "owner@acme.test").await;
}

#[tokio::test]
async fn test_retained_store_blocks_reregistration_until_purged() {
    let app = app().await;
    let admin = admin_token(&app).await;
    register(&app, &admin, "acme", "owner@acme.test").await;

    let (status, _) = send(&app, Method::DELETE, CENTRAL, "/v1/tenants/acme", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = register(&app, &admin, "acme", "new@acme.test").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["fields"]["subdomain"].is_array());
    let (status, _) = send(&app, Method::GET, ACME, "/health", None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_short_owner_password_creates_nothing() {
    let app = app().await;
    let admin = admin_token(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        CENTRAL,
        "/v1/tenants",
        Some(&admin),
        Some(json!({
            "subdomain": "acme",
            "name": "Acme Rentals",
            "email": "owner@acme.test",
            "owner_name": "Alice Owner",
            "owner_password": "short",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["fields"]["owner_password"].is_array());

    let (status, _) = send(&app, Method::GET, CENTRAL, "/v1/tenants/acme", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_provision_seeds_missing_owner() {
    let app = app().await;
    let admin = admin_token(&app).await;

    let (status, _) = send(
        &app,
        Method::POST,
        CENTRAL,
        "/v1/tenants",
        Some(&admin),
        Some(json!({
            "subdomain": "acme",
            "name": "Acme Rentals",
            "email": "owner@acme.test",
            "owner_name": "Alice Owner",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Plain re-provision needs no body
    let (status, _) = send(&app, Method::POST, CENTRAL, "/v1/tenants/acme/provision", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        CENTRAL,
        "/v1/tenants/acme/provision",
        Some(&admin),
        Some(json!({"owner_password": OWNER_PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    tenant_token(&app, ACME, "owner@acme.test").await;
}

#[tokio::test]
async fn test_suspended_tenant_is_rejected_but_reports_health() {
    let app = app().await;
    let admin = admin_token(&app).await;
    register(&app, &admin, "acme", "owner@acme.test").await;
    let token = tenant_token(&app, ACME, "owner@acme.test").await;

    let (status, body) = send(&app, Method::POST, CENTRAL, "/v1/tenants/acme/suspend", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "suspended");

    let (status, body) = send(&app, Method::GET, ACME, "/v1/houses", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "TENANT_INACTIVE");

    let (status, body) = send(
        &app,
        Method::POST,
        ACME,
        "/v1/login",
        None,
        Some(json!({"email": "owner@acme.test", "password": OWNER_PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "TENANT_INACTIVE");

    let (status, body) = send(&app, Method::GET, ACME, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tenant_id"], "acme");
    assert_eq!(body["data"]["tenant_status"], "suspended");

    let (status, _) = send(&app, Method::POST, CENTRAL, "/v1/tenants/acme/activate", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, ACME, "/v1/houses", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_deleted_tenant_domain_stops_resolving() {
    let app = app().await;
    let admin = admin_token(&app).await;
    register(&app, &admin, "acme", "owner@acme.test").await;

    let (status, _) = send(
        &app,
        Method::DELETE,
        CENTRAL,
        "/v1/tenants/acme?purge_store=true",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, ACME, "/health", None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "UNKNOWN_TENANT");

    let (status, _) = send(&app, Method::GET, CENTRAL, "/v1/tenants/acme", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tokens_do_not_cross_hosts() {
    let app = app().await;
    let admin = admin_token(&app).await;
    register(&app, &admin, "acme", "owner@acme.test").await;
    register(&app, &admin, "beta", "owner@beta.test").await;
    let acme = tenant_token(&app, ACME, "owner@acme.test").await;

    // Admin token on a tenant host
    let (status, body) = send(&app, Method::GET, ACME, "/v1/houses", Some(&admin), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    // Tenant token on another tenant's host
    let (status, _) = send(&app, Method::GET, BETA, "/v1/houses", Some(&acme), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Tenant token on the central host
    let (status, _) = send(&app, Method::GET, CENTRAL, "/v1/tenants", Some(&acme), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::GET, BETA, "/v1/houses", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
