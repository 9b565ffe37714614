//! The dashboard page model.
//!
//! [`render`] is a pure function of the loaded dataset and the filter
//! state. Every output format (HTML, Markdown, JSON) is a projection of
//! the [`Page`] it returns.

use crate::analysis::{aggregate, filter_at_least, Aggregate, AnalysisError, FilterState};
use crate::models::{DataSource, Dataset, LoadedDataset, Record};
use serde::Serialize;

/// Name of the query parameter bound to the slider.
pub const THRESHOLD_PARAM: &str = "min_sales";

/// One rendered dashboard pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub title: String,
    pub sections: Vec<Section>,
    pub footer: String,
}

#[cfg(test)]
impl Page {
    pub fn charts(&self) -> impl Iterator<Item = &Chart> {
        self.sections.iter().filter_map(|s| match s {
            Section::Chart(chart) => Some(chart),
            _ => None,
        })
    }

    pub fn banners(&self) -> impl Iterator<Item = &Banner> {
        self.sections.iter().filter_map(|s| match s {
            Section::Banner(banner) => Some(banner),
            _ => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.sections.iter().filter_map(|s| match s {
            Section::Table(table) => Some(table),
            _ => None,
        })
    }

    pub fn slider(&self) -> Option<&SliderControl> {
        self.sections.iter().find_map(|s| match s {
            Section::Slider(slider) => Some(slider),
            _ => None,
        })
    }
}

/// A block on the page, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Section {
    Heading { text: String },
    Banner(Banner),
    Table(Table),
    Chart(Chart),
    Slider(SliderControl),
    NoData { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerLevel {
    Success,
    Info,
    Warning,
}

/// A status message about loading or filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Banner {
    pub level: BannerLevel,
    pub message: String,
}

impl Banner {
    fn new(level: BannerLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// A chart over a non-empty aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ChartPoint>,
    /// Sum over all points.
    pub total: f64,
}

/// The minimum-sales slider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderControl {
    pub name: String,
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: f64,
}

/// Presentation options that do not depend on the data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    /// Overrides the dashboard's default title.
    pub title: Option<String>,
}

/// Build the page for a dataset and filter state.
pub fn render(loaded: &LoadedDataset, filter: &FilterState, options: &RenderOptions) -> Page {
    let kind = loaded.kind;
    let dataset = &loaded.dataset;
    let value_column = dataset.value_column.as_str();
    let mut sections = Vec::new();

    sections.extend(load_banners(loaded).into_iter().map(Section::Banner));

    // Full dataset and its aggregates
    sections.push(heading("Dataset"));
    sections.push(Section::Table(records_table(dataset, dataset.records.iter())));

    if let Some(time_dim) = kind.time_dimension() {
        sections.push(heading(format!("{} by {}", value_column, time_dim)));
        sections.push(chart_section(
            ChartKind::Line,
            format!("{} by {}", value_column, time_dim),
            time_dim,
            value_column,
            aggregate(dataset, time_dim, value_column),
        ));
    }

    let nominal_dim = kind.nominal_dimension();
    sections.push(heading(format!("{} by {}", value_column, nominal_dim)));
    sections.push(chart_section(
        ChartKind::Bar,
        format!("{} by {}", value_column, nominal_dim),
        nominal_dim,
        value_column,
        aggregate(dataset, nominal_dim, value_column),
    ));

    // Filter control
    sections.push(heading("Filter"));
    match filter.bounds() {
        Some(bounds) => sections.push(Section::Slider(SliderControl {
            name: THRESHOLD_PARAM.to_string(),
            label: format!("Minimum {}", value_column),
            min: bounds.min,
            max: bounds.max,
            step: bounds.step,
            value: filter.threshold(),
        })),
        None => sections.push(Section::Banner(Banner::new(
            BannerLevel::Info,
            "The dataset is empty; there is nothing to filter.",
        ))),
    }

    // Filtered view
    let view = filter_at_least(dataset, filter.threshold());
    let threshold = view.threshold();

    sections.push(Section::Banner(if view.is_empty() {
        Banner::new(
            BannerLevel::Warning,
            format!(
                "No data: no rows have {} ≥ {}.",
                value_column,
                format_value(threshold)
            ),
        )
    } else {
        Banner::new(
            BannerLevel::Success,
            format!(
                "{} of {} rows have {} ≥ {} (total {}).",
                view.len(),
                dataset.len(),
                value_column,
                format_value(threshold),
                format_value(view.total())
            ),
        )
    }));

    sections.push(heading("Filtered data"));
    sections.push(Section::Table(records_table(
        dataset,
        view.rows().iter().copied(),
    )));

    sections.push(heading(format!("Filtered {} by {}", value_column, nominal_dim)));
    if view.is_empty() {
        sections.push(Section::NoData {
            message: "No data to chart for the current filter.".to_string(),
        });
    } else {
        sections.push(chart_section(
            ChartKind::Bar,
            format!(
                "{} by {} (≥ {})",
                value_column,
                nominal_dim,
                format_value(threshold)
            ),
            nominal_dim,
            value_column,
            view.aggregate(nominal_dim),
        ));
    }

    Page {
        title: options
            .title
            .clone()
            .unwrap_or_else(|| kind.title().to_string()),
        sections,
        footer: format!(
            "Source: {} | {} rows | total {} {} | loaded {}",
            loaded.source,
            dataset.len(),
            value_column,
            format_value(dataset.total()),
            loaded.loaded_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
    }
}

/// Banners describing where the data came from.
fn load_banners(loaded: &LoadedDataset) -> Vec<Banner> {
    let mut banners = Vec::new();

    match &loaded.source {
        DataSource::File(path) => banners.push(Banner::new(
            BannerLevel::Success,
            format!(
                "Loaded {} rows from {}.",
                loaded.dataset.len(),
                path.display()
            ),
        )),
        DataSource::Fallback => banners.push(Banner::new(
            BannerLevel::Info,
            "No data file found; using sample data.",
        )),
    }

    for skipped in loaded.malformed_sources() {
        banners.push(Banner::new(
            BannerLevel::Warning,
            format!(
                "Skipped malformed file {}: {}",
                skipped.path.display(),
                skipped.reason
            ),
        ));
    }

    banners
}

fn heading(text: impl Into<String>) -> Section {
    Section::Heading { text: text.into() }
}

fn records_table<'a, I>(dataset: &Dataset, records: I) -> Table
where
    I: IntoIterator<Item = &'a Record>,
{
    Table {
        columns: dataset.columns(),
        rows: records
            .into_iter()
            .map(|r| {
                let mut row = r.categories.clone();
                row.push(format_value(r.value));
                row
            })
            .collect(),
    }
}

/// A chart, or a notice in its place when there is nothing to draw.
fn chart_section(
    kind: ChartKind,
    title: String,
    x_label: &str,
    y_label: &str,
    aggregate: Result<Aggregate, AnalysisError>,
) -> Section {
    let aggregate = match aggregate {
        Ok(aggregate) => aggregate,
        Err(e) => {
            return Section::Banner(Banner::new(
                BannerLevel::Warning,
                format!("Cannot chart {}: {}", title, e),
            ))
        }
    };

    if aggregate.is_empty() {
        return Section::NoData {
            message: format!("No data to chart for {}.", title),
        };
    }

    let entries = match kind {
        ChartKind::Line => aggregate.chronological(),
        ChartKind::Bar => aggregate.iter().collect(),
    };

    Section::Chart(Chart {
        kind,
        title,
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        total: aggregate.total(),
        points: entries
            .into_iter()
            .map(|(label, value)| ChartPoint {
                label: label.to_string(),
                value,
            })
            .collect(),
    })
}

/// Whole numbers without decimals, everything else with two.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}
