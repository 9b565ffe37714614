//! Minimum-sales filtering and the slider state that drives it.

use crate::analysis::aggregator::{group_sum, Aggregate, AnalysisError};
use crate::models::{Dataset, Record};
use serde::{Deserialize, Serialize};

/// Default slider step.
pub const DEFAULT_STEP: f64 = 10.0;

/// Rows of a dataset whose value is at or above a threshold.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    source: &'a Dataset,
    threshold: f64,
    rows: Vec<&'a Record>,
}

impl<'a> FilteredView<'a> {
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Matching rows in dataset order.
    pub fn rows(&self) -> &[&'a Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.rows.iter().map(|r| r.value).sum()
    }

    /// Group the matching rows by a category column.
    pub fn aggregate(&self, group_by: &str) -> Result<Aggregate, AnalysisError> {
        let idx = self
            .source
            .dimension_index(group_by)
            .ok_or_else(|| AnalysisError::UnknownColumn(group_by.to_string()))?;
        Ok(group_sum(self.rows.iter().copied(), idx))
    }
}

/// Keep the rows whose value is `>= threshold`.
pub fn filter_at_least(dataset: &Dataset, threshold: f64) -> FilteredView<'_> {
    FilteredView {
        source: dataset,
        threshold,
        rows: dataset
            .records
            .iter()
            .filter(|r| r.value >= threshold)
            .collect(),
    }
}

/// Range and step of the minimum-sales slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SliderBounds {
    /// Bounds spanning the dataset's values; `None` for an empty dataset.
    pub fn from_dataset(dataset: &Dataset, step: f64) -> Option<Self> {
        let min = dataset.min_value()?;
        let max = dataset.max_value()?;
        Some(Self { min, max, step })
    }

    /// Clamp into range and snap onto `min + k * step`. `max` is always reachable.
    pub fn snap(&self, value: f64) -> f64 {
        if !value.is_finite() || value <= self.min {
            return self.min;
        }
        if value >= self.max {
            return self.max;
        }
        if self.step <= 0.0 {
            return value;
        }

        let snapped = self.min + ((value - self.min) / self.step).round() * self.step;
        snapped.min(self.max)
    }
}

/// The user's current minimum-sales threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterState {
    bounds: Option<SliderBounds>,
    threshold: f64,
}

/// Interactions that change the filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterEvent {
    /// Slider moved to a new value.
    SetThreshold(f64),
    /// Back to the initial state.
    Reset,
}

impl FilterState {
    /// Initial state: threshold at the slider minimum (0 with no data).
    pub fn initial(bounds: Option<SliderBounds>) -> Self {
        Self {
            bounds,
            threshold: bounds.map(|b| b.min).unwrap_or(0.0),
        }
    }

    /// Initial state for a dataset.
    pub fn for_dataset(dataset: &Dataset, step: f64) -> Self {
        Self::initial(SliderBounds::from_dataset(dataset, step))
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn bounds(&self) -> Option<&SliderBounds> {
        self.bounds.as_ref()
    }
}

/// Apply one interaction to the filter state.
pub fn update(state: FilterState, event: FilterEvent) -> FilterState {
    match event {
        FilterEvent::SetThreshold(value) => {
            let threshold = match state.bounds {
                Some(bounds) => bounds.snap(value),
                None if value.is_finite() => value,
                None => state.threshold,
            };
            FilterState { threshold, ..state }
        }
        FilterEvent::Reset => FilterState::initial(state.bounds),
    }
}
