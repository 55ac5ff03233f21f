/// RegTime: project dashboard backend
///
/// Main entry point. Loads configuration from the environment and starts the HTTP server.

use regtime::{config::Config, server::start_server};

/// Application entry point
///
/// The server provides:
/// - Project API at /api/projects/*
/// - Property search at /api/properties/search
/// - Dashboard metrics at /api/dashboard/metrics
/// - Auth passthrough at /api/auth/*
/// - Contact form embed at /contact/embed
/// - Health checks at /healthz and /api/health
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration (defaults to 0.0.0.0:3000 and a local data service)
    let config = Config::default();

    start_server(config).await?;

    Ok(())
}
