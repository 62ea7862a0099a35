//! Device Registry
//!
//! Main entry point for the device check-out server.

use device_registry::{
    device_registry::DeviceRegistryService,
    state::{AppConfig, AppState},
    web_api,
};
use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "device_registry=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting device registry v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::default();
    tracing::info!(
        db_host = %config.db_host,
        db_port = config.db_port,
        db_name = %config.db_name,
        db_user = %config.db_user,
        db_max_connections = config.db_max_connections,
        port = config.port,
        "Configuration loaded"
    );

    // Create database pool
    let pool = MySqlPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect_with(config.connect_options())
        .await?;

    tracing::info!("Database connected");

    let registry = Arc::new(DeviceRegistryService::new(pool));

    // A registry without its table cannot serve any endpoint
    if let Err(e) = registry.init().await {
        tracing::error!(error = %e, "Database initialization failed");
        return Err(e.into());
    }

    let state = AppState {
        config,
        registry,
    };

    let app = web_api::create_router(state.clone())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = state.config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
