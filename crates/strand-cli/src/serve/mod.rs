//! Local JSON API over a loaded discourse graph.
//!
//! # Module Structure
//!
//! - `handlers` - HTTP route handlers
//! - `models` - API request/response types (DTOs)

mod handlers;
mod models;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use strand_core::{FileSource, GraphHandle};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state for the server.
pub struct AppState {
    /// Current graph snapshot, swapped on reload.
    pub graph: Arc<GraphHandle>,
    /// Dataset the graph is reloaded from.
    pub source: FileSource,
}

// =============================================================================
// Server Configuration
// =============================================================================

/// Where the server listens.
pub struct ServeConfig {
    pub host: String,
    pub port: u16,
}

// =============================================================================
// Server Entry Point
// =============================================================================

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/search", get(handlers::api_search))
        .route("/api/nodes/{uid}", get(handlers::api_node))
        .route("/api/nodes/{uid}/neighbors", get(handlers::api_neighbors))
        .route("/api/nodes/{uid}/neighborhood", get(handlers::api_neighborhood))
        .route("/api/schemas", get(handlers::api_schemas))
        .route("/api/creators", get(handlers::api_creators))
        .route("/api/stats", get(handlers::api_stats))
        .route("/api/reload", post(handlers::api_reload))
        // CORS for browser clients
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

/// Serve the API until the process is stopped.
pub async fn start_server(state: AppState, config: ServeConfig) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.port))?;

    let app = router(Arc::new(state));

    info!(%addr, "Starting Strand API server");
    println!("Strand API listening on http://{}", addr);
    println!("Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
