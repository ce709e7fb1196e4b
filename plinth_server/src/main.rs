mod api;
mod config;

use std::sync::Arc;

use plinth_core::FileReportWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plinth_server=debug,plinth_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Plinth footing design service");

    let config = ServerConfig::from_env();
    let settings = config.design_settings().map_err(|e| {
        tracing::error!("Design settings could not be loaded: {}", e);
        e
    })?;

    match &config.settings_path {
        Some(path) => tracing::info!("Design settings loaded from {}", path.display()),
        None => tracing::info!("Using built-in design settings"),
    }
    tracing::info!("Reports directory: {}", config.reports_dir.display());

    let reports = Arc::new(FileReportWriter::new(config.reports_dir.clone()));
    let app = api::create_router(api::AppState::new(settings, reports));

    let addr = config.bind_addr();
    tracing::info!("Listening on {}", addr);
    tracing::info!("API endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  GET  /api/v1/version");
    tracing::info!("  POST /api/v1/footing");
    tracing::info!("  POST /api/v1/combined-footing");
    tracing::info!("  POST /api/v1/punching");
    tracing::info!("  POST /api/v1/crack-width");
    tracing::info!("  POST /api/v1/deflection");
    tracing::info!("  POST /api/v1/drawings");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
