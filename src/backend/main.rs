/**
 * HomeShare Server Entry Point
 *
 * Loads `.env`, initializes tracing, builds the app from the environment
 * and serves it until Ctrl-C.
 */

use std::net::SocketAddr;

use homeshare::backend::server::{create_app, Config};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "homeshare=debug,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = Config::from_env()?;
    tracing::info!(environment = ?config.environment, "Configuration loaded");

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let (app, app_state) = create_app(config).await?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped, closing store");
    app_state.store.close().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
