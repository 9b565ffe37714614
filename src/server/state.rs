//! Shared application state for the dashboard server.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Instant;

use crate::analysis::{update, FilterEvent, FilterState};
use crate::loader::DatasetCache;
use crate::models::LoadedDataset;
use crate::report::{ChartStyle, RenderOptions};

/// Shared state available to all request handlers.
pub struct AppState {
    /// Load-once dataset for this process.
    pub cache: DatasetCache,

    /// Slider step.
    pub step: f64,

    /// Threshold used when a request carries none (`--min-sales`).
    pub default_threshold: Option<f64>,

    pub options: RenderOptions,
    pub chart: ChartStyle,

    /// Server start time (for uptime reporting).
    pub started_at: Instant,

    /// Dashboard renders served (for /health).
    pub total_renders: AtomicU64,
}

impl AppState {
    pub fn new(
        cache: DatasetCache,
        step: f64,
        default_threshold: Option<f64>,
        options: RenderOptions,
        chart: ChartStyle,
    ) -> Self {
        Self {
            cache,
            step,
            default_threshold,
            options,
            chart,
            started_at: Instant::now(),
            total_renders: AtomicU64::new(0),
        }
    }

    /// Filter state for a request: the initial state, then the configured
    /// default, then the requested threshold, each snapped to the slider.
    pub fn filter_for(&self, loaded: &LoadedDataset, requested: Option<f64>) -> FilterState {
        let mut state = FilterState::for_dataset(&loaded.dataset, self.step);
        for threshold in [self.default_threshold, requested].into_iter().flatten() {
            state = update(state, FilterEvent::SetThreshold(threshold));
        }
        state
    }
}

/// Type alias used in axum handlers.
pub type SharedState = Arc<AppState>;
