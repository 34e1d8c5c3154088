//! HTTP server module.
//!
//! Serves the navigator pages and their JSON counterparts.

pub mod api;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub use state::{AppState, ServerConfig};

/// Run the HTTP server.
///
/// This function blocks until the server is shut down (e.g., via Ctrl+C).
pub async fn run_server(config: ServerConfig, state: Arc<AppState>) -> Result<()> {
    let app = build_router(state);

    let addr = SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

/// Build the main router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    api::routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = ?e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}
