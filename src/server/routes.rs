//! HTTP route handlers for the dashboard server.

use std::sync::atomic::Ordering;

use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{update, FilterEvent};
use crate::models::DataSource;
use crate::report::{generate_html_report, render, Page};
use crate::server::state::SharedState;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/view", get(view_handler))
        .route("/health", get(health_handler))
}

/// Query string shared by the page endpoints.
///
/// The threshold is kept as text so a malformed value falls back to the
/// default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    min_sales: Option<String>,
    /// Any value restores the initial threshold.
    reset: Option<String>,
}

impl ViewQuery {
    fn threshold(&self) -> Option<f64> {
        self.min_sales
            .as_deref()
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }
}

fn render_page(state: &SharedState, query: &ViewQuery) -> Page {
    let loaded = state.cache.dataset();
    let mut filter = state.filter_for(&loaded, query.threshold());
    if query.reset.is_some() {
        filter = update(filter, FilterEvent::Reset);
    }
    debug!(threshold = filter.threshold(), "rendering dashboard");

    state.total_renders.fetch_add(1, Ordering::Relaxed);
    render(&loaded, &filter, &state.options)
}

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

async fn index_handler(
    State(state): State<SharedState>,
    Query(query): Query<ViewQuery>,
) -> Html<String> {
    let page = render_page(&state, &query);
    Html(generate_html_report(&page, &state.chart))
}

// ---------------------------------------------------------------------------
// GET /api/view
// ---------------------------------------------------------------------------

async fn view_handler(
    State(state): State<SharedState>,
    Query(query): Query<ViewQuery>,
) -> Json<Page> {
    Json(render_page(&state, &query))
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    dashboard: String,
    source: DataSource,
    fallback: bool,
    rows: usize,
    total: f64,
    uptime_s: f64,
    total_renders: u64,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    let loaded = state.cache.dataset();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        dashboard: loaded.kind.to_string(),
        source: loaded.source.clone(),
        fallback: loaded.is_fallback(),
        rows: loaded.dataset.len(),
        total: loaded.dataset.total(),
        uptime_s: state.started_at.elapsed().as_secs_f64(),
        total_renders: state.total_renders.load(Ordering::Relaxed),
    })
}
