/// Server setup and initialization
///
/// Wires together the data service clients, project storage and HTTP routes.
/// Provides the main application factory function for creating the Axum app.

use crate::{
    api::{
        create_auth_routes, create_contact_routes, create_dashboard_routes, create_project_routes,
        create_property_routes, AppState,
    },
    config::Config,
    db::{AuthClient, DataClient},
    project::ProjectStorage,
};
use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Build shared state from configuration
///
/// Both clients share one connection pool.
pub fn create_state(config: &Config) -> Result<AppState> {
    tracing::info!("🗄️ Connecting to data service at {}", config.database.url);
    if config.database.anon_key.is_empty() {
        tracing::warn!("⚠️ SUPABASE_ANON_KEY is empty, requests will be anonymous");
    }

    let http = reqwest::Client::new();
    let db = DataClient::with_http(http.clone(), &config.database)
        .map_err(|e| anyhow::anyhow!("Failed to initialize data client: {}", e))?;
    let auth = AuthClient::with_http(http, &config.database)
        .map_err(|e| anyhow::anyhow!("Failed to initialize auth client: {}", e))?;

    Ok(AppState {
        projects: ProjectStorage::new(db.clone()),
        db,
        auth,
        form: config.form.clone(),
    })
}

/// Create the router with every endpoint over the given state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check endpoints
        .route("/healthz", get(health_check))
        .route("/api/health", get(api_health))
        .merge(create_project_routes())
        .merge(create_property_routes())
        .merge(create_dashboard_routes())
        .merge(create_auth_routes())
        .merge(create_contact_routes())
        .with_state(state)
}

/// Create the main Axum application with all routes
pub async fn create_app(config: Config) -> Result<Router> {
    tracing::info!("🏗️ Creating application state");
    let state = create_state(&config)?;

    tracing::info!("📡 Creating HTTP router with all endpoints");
    let app = create_router(state);

    tracing::info!("✅ Application initialized successfully");
    Ok(app)
}

/// Start the HTTP server with the given configuration
///
/// Creates the application and starts the Axum server on the configured address and port.
pub async fn start_server(config: Config) -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("Starting RegTime server...");

    let app = create_app(config.clone()).await?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Health check endpoint handler
async fn health_check() -> &'static str {
    "ok"
}

/// JSON health check with server time
async fn api_health() -> Json<Value> {
    Json(json!({ "ok": true, "time": chrono::Utc::now().to_rfc3339() }))
}
