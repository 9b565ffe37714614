//! Data models for the sales dashboards.
//!
//! This module contains the core data structures shared by the loader,
//! the analysis functions and the presenter: dashboard kinds, records,
//! datasets and the bookkeeping around where a dataset came from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The dashboards this binary can serve.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DashboardKind {
    /// Daily and per-product sales (`Date`, `Product`, `Sales`)
    #[default]
    Products,
    /// Sales per prefecture (`prefecture`, `sales`)
    Prefectures,
}

impl fmt::Display for DashboardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardKind::Products => write!(f, "products"),
            DashboardKind::Prefectures => write!(f, "prefectures"),
        }
    }
}

impl DashboardKind {
    /// Category columns, in the order they are stored on each [`Record`].
    pub fn dimensions(&self) -> &'static [&'static str] {
        match self {
            DashboardKind::Products => &["Date", "Product"],
            DashboardKind::Prefectures => &["prefecture"],
        }
    }

    /// Numeric column holding the sales amount.
    pub fn value_column(&self) -> &'static str {
        match self {
            DashboardKind::Products => "Sales",
            DashboardKind::Prefectures => "sales",
        }
    }

    /// Time-like dimension charted as a line, if the dashboard has one.
    pub fn time_dimension(&self) -> Option<&'static str> {
        match self {
            DashboardKind::Products => Some("Date"),
            DashboardKind::Prefectures => None,
        }
    }

    /// Nominal dimension charted as bars.
    pub fn nominal_dimension(&self) -> &'static str {
        match self {
            DashboardKind::Products => "Product",
            DashboardKind::Prefectures => "prefecture",
        }
    }

    /// Default page title.
    pub fn title(&self) -> &'static str {
        match self {
            DashboardKind::Products => "Multi-chart sales dashboard",
            DashboardKind::Prefectures => "Sales by prefecture",
        }
    }

    /// Files tried, in order, when neither the CLI nor the config names any.
    pub fn default_candidates(&self) -> Vec<PathBuf> {
        let names: &[&str] = match self {
            DashboardKind::Products => &["sales_data.csv", "data/sales_data.csv"],
            DashboardKind::Prefectures => &[
                "prefecture_sales.csv",
                "data/prefecture_sales.csv",
                "sales_data.csv",
                "data/sales_data.csv",
            ],
        };
        names.iter().map(PathBuf::from).collect()
    }
}

/// A single sales row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Category values, aligned with [`Dataset::dimensions`].
    pub categories: Vec<String>,
    /// Sales amount (never negative).
    pub value: f64,
}

impl Record {
    pub fn new(categories: Vec<String>, value: f64) -> Self {
        Self { categories, value }
    }

    /// Category value at the given dimension index.
    pub fn category(&self, idx: usize) -> &str {
        self.categories.get(idx).map(String::as_str).unwrap_or("")
    }
}

/// An ordered, loaded sales table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Names of the category columns.
    pub dimensions: Vec<String>,
    /// Name of the numeric column.
    pub value_column: String,
    /// Rows in file order.
    pub records: Vec<Record>,
}

impl Dataset {
    /// Creates an empty dataset with the schema of the given dashboard.
    pub fn for_kind(kind: DashboardKind) -> Self {
        Self {
            dimensions: kind.dimensions().iter().map(|d| d.to_string()).collect(),
            value_column: kind.value_column().to_string(),
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, categories: Vec<String>, value: f64) {
        self.records.push(Record::new(categories, value));
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index of a category column by name.
    pub fn dimension_index(&self, name: &str) -> Option<usize> {
        self.dimensions.iter().position(|d| d == name)
    }

    /// All column names, categories first.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = self.dimensions.clone();
        columns.push(self.value_column.clone());
        columns
    }

    /// Sum of all values.
    pub fn total(&self) -> f64 {
        self.records.iter().map(|r| r.value).sum()
    }

    pub fn min_value(&self) -> Option<f64> {
        self.records.iter().map(|r| r.value).reduce(f64::min)
    }

    pub fn max_value(&self) -> Option<f64> {
        self.records.iter().map(|r| r.value).reduce(f64::max)
    }
}

/// Where a dataset was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "lowercase")]
pub enum DataSource {
    /// A CSV file on disk.
    File(PathBuf),
    /// The built-in sample table.
    Fallback,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Fallback => write!(f, "fallback sample data"),
        }
    }
}

/// A candidate file that was passed over during loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedSource {
    pub path: PathBuf,
    pub reason: String,
    /// True when the file existed but could not be parsed.
    pub malformed: bool,
}

/// A dataset together with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedDataset {
    pub kind: DashboardKind,
    pub dataset: Dataset,
    pub source: DataSource,
    pub skipped: Vec<SkippedSource>,
    pub loaded_at: DateTime<Utc>,
}

impl LoadedDataset {
    /// Skipped sources that existed but failed to parse.
    pub fn malformed_sources(&self) -> impl Iterator<Item = &SkippedSource> {
        self.skipped.iter().filter(|s| s.malformed)
    }

    pub fn is_fallback(&self) -> bool {
        self.source == DataSource::Fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        let mut ds = Dataset::for_kind(DashboardKind::Prefectures);
        ds.push(vec!["Tokyo".to_string()], 300.0);
        ds.push(vec!["Osaka".to_string()], 200.0);
        ds.push(vec!["Kanagawa".to_string()], 250.0);
        ds
    }

    #[test]
    fn test_dataset_schema() {
        let ds = Dataset::for_kind(DashboardKind::Products);
        assert_eq!(ds.columns(), vec!["Date", "Product", "Sales"]);
        assert_eq!(ds.dimension_index("Product"), Some(1));
        assert_eq!(ds.dimension_index("Sales"), None);
    }

    #[test]
    fn test_dataset_min_max_total() {
        let ds = sample();
        assert_eq!(ds.min_value(), Some(200.0));
        assert_eq!(ds.max_value(), Some(300.0));
        assert_eq!(ds.total(), 750.0);

        let empty = Dataset::for_kind(DashboardKind::Prefectures);
        assert_eq!(empty.min_value(), None);
        assert_eq!(empty.max_value(), None);
        assert_eq!(empty.total(), 0.0);
    }

    #[test]
    fn test_data_source_display() {
        assert_eq!(DataSource::Fallback.to_string(), "fallback sample data");
        assert_eq!(
            DataSource::File(PathBuf::from("data/sales.csv")).to_string(),
            "data/sales.csv"
        );
    }

    #[test]
    fn test_dashboard_schema() {
        assert_eq!(DashboardKind::Products.time_dimension(), Some("Date"));
        assert_eq!(DashboardKind::Prefectures.time_dimension(), None);
        assert_eq!(DashboardKind::Prefectures.nominal_dimension(), "prefecture");
        assert_eq!(DashboardKind::Prefectures.value_column(), "sales");
    }
}
