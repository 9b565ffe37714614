//! HTTP server for the interactive dashboard.
//!
//! # Endpoints
//!
//! - `GET /`          — HTML dashboard, threshold in `?min_sales=`
//! - `GET /api/view`  — the same page as JSON
//! - `GET /health`    — status, data source, row count

mod routes;
mod state;

pub use state::{AppState, SharedState};

use anyhow::{Context, Result};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the application with tracing and serve it on `host:port`.
pub async fn serve(state: SharedState, host: &str, port: u16) -> Result<()> {
    let kind = state.cache.kind();
    let app = Router::new()
        .merge(routes::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;

    let addr = listener.local_addr().context("Failed to read bound address")?;
    info!(%addr, dashboard = %kind, "salesdash listening");
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
