//! Group-by-and-sum aggregation.
//!
//! Aggregates are keyed by category value and iterate in ascending key
//! order, so the same dataset always produces the same chart.

use crate::models::{Dataset, Record};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised by the analysis functions.
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("unknown column: {0}")]
    UnknownColumn(String),
}

/// Category → summed value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Aggregate {
    totals: BTreeMap<String, f64>,
}

impl Aggregate {
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Entries in ascending category order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.totals.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Sum over all categories.
    pub fn total(&self) -> f64 {
        self.totals.values().sum()
    }

    /// Entries ordered by date when every key is a date, else by key.
    pub fn chronological(&self) -> Vec<(&str, f64)> {
        let dated: Option<Vec<(NaiveDate, &str, f64)>> = self
            .iter()
            .map(|(k, v)| parse_date(k).map(|d| (d, k, v)))
            .collect();

        match dated {
            Some(mut entries) => {
                entries.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
                entries.into_iter().map(|(_, k, v)| (k, v)).collect()
            }
            None => self.iter().collect(),
        }
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    ["%Y-%m-%d", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Sum record values grouped by the category at `dim_idx`.
pub fn group_sum<'a, I>(records: I, dim_idx: usize) -> Aggregate
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();

    for record in records {
        *totals.entry(record.category(dim_idx).to_string()).or_default() += record.value;
    }

    Aggregate { totals }
}

/// Group a dataset by `group_by` and sum `value_field`.
///
/// `value_field` must name the dataset's value column.
pub fn aggregate(
    dataset: &Dataset,
    group_by: &str,
    value_field: &str,
) -> Result<Aggregate, AnalysisError> {
    if value_field != dataset.value_column {
        return Err(AnalysisError::UnknownColumn(value_field.to_string()));
    }

    let idx = dataset
        .dimension_index(group_by)
        .ok_or_else(|| AnalysisError::UnknownColumn(group_by.to_string()))?;

    Ok(group_sum(&dataset.records, idx))
}
