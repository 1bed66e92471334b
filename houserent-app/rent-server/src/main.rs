use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use rent_api::{build_router, AppState, Backends};
use rent_shared::config::{AppConfig, StorageBackend};
use rent_infrastructure::{
    bootstrap_central_schema, create_pool, MemoryAdminRepository, MemoryTenantDirectory,
    MemoryTenantStoreFactory, MemoryTokenRepository, PgAdminRepository, PgTenantDirectory,
    PgTenantStoreFactory, PgTokenRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize telemetry
    rent_shared::telemetry::init_telemetry(&config.log)?;
    info!(env = %config.app.env, "HouseRent server starting...");

    // Storage adapters
    let backends = match config.database.backend {
        StorageBackend::Postgres => {
            info!("Connecting to central database...");
            let pool = create_pool(&config.database).await?;
            bootstrap_central_schema(&pool).await?;
            info!("Central schema ready.");

            Backends {
                directory: Arc::new(PgTenantDirectory::new(pool.clone())),
                admins: Arc::new(PgAdminRepository::new(pool.clone())),
                tokens: Arc::new(PgTokenRepository::new(pool.clone())),
                stores: Arc::new(PgTenantStoreFactory::new(
                    pool,
                    config.database.clone(),
                    config.tenancy.tenant_schema_prefix.clone(),
                )),
            }
        }
        StorageBackend::Memory => {
            warn!("Using the in-memory backend; data is lost on shutdown");
            Backends {
                directory: Arc::new(MemoryTenantDirectory::new()),
                admins: Arc::new(MemoryAdminRepository::new()),
                tokens: Arc::new(MemoryTokenRepository::new()),
                stores: Arc::new(MemoryTenantStoreFactory::new()),
            }
        }
    };

    let state = AppState::new(backends, &config);

    // First admin
    match (&config.auth.bootstrap_admin_email, &config.auth.bootstrap_admin_password) {
        (Some(email), Some(password)) => {
            if let Err(e) = state
                .auth
                .bootstrap_admin(&config.auth.bootstrap_admin_name, email, password)
                .await
            {
                error!("Failed to bootstrap admin: {}", e);
                return Err(e.into());
            }
        }
        _ => info!("No bootstrap admin configured"),
    }

    let app = build_router(state).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]),
    );

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!(
        central = ?config.tenancy.central_domains,
        base_domain = %config.tenancy.base_domain,
        "Listening on {}",
        addr
    );

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HouseRent server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
