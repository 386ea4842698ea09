use std::net::SocketAddr;

use anyhow::Context;
use tracing::info;

use cattery_api::{build_router, AppState};
use cattery_shared::config::AppConfig;
use cattery_shared::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize telemetry; the guard flushes the file writer on exit
    let _log_guard = init_telemetry(&config.log)?;

    info!(
        "{} starting ({} environment)...",
        config.app.name, config.app.env
    );

    // Connect to the store
    let repo = cattery_infrastructure::connect(&config.database)
        .await
        .context("Failed to connect to the cat store")?;
    info!("Store ready.");

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));

    // Build router
    let app = build_router(AppState::new(repo, config));

    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
