//! Dataset loading with a fallback chain.
//!
//! Candidate CSV files are tried in order. A missing or unreadable file
//! moves on to the next candidate; when every candidate fails the
//! dashboard's built-in sample table is used. Loading never fails.

mod fallback;

pub use fallback::fallback_dataset;

use crate::models::{DashboardKind, DataSource, Dataset, LoadedDataset, SkippedSource};
use chrono::Utc;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Reasons a single candidate file could not be used.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing header line")]
    MissingHeader,

    #[error("missing column: {0}")]
    MissingColumn(String),

    #[error("row {row}: invalid {column} value {value:?}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: negative {column} value {value}")]
    NegativeValue { row: usize, column: String, value: f64 },
}

impl LoadError {
    /// True when the file simply wasn't there (as opposed to being broken).
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound(_))
    }
}

/// Parse CSV content for the given dashboard.
///
/// Columns are matched by exact header name; extra columns are ignored.
/// A header-only input yields an empty dataset.
pub fn parse_csv<R: Read>(reader: R, kind: DashboardKind) -> Result<Dataset, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(LoadError::MissingHeader);
    }

    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
    };

    let dim_indices = kind
        .dimensions()
        .iter()
        .map(|&d| find(d))
        .collect::<Result<Vec<_>, _>>()?;
    let value_column = kind.value_column();
    let value_idx = find(value_column)?;

    let mut dataset = Dataset::for_kind(kind);

    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is line 1
        let row = i + 2;

        let raw = record.get(value_idx).unwrap_or_default();
        let value = match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                return Err(LoadError::InvalidValue {
                    row,
                    column: value_column.to_string(),
                    value: raw.to_string(),
                })
            }
        };
        if value < 0.0 {
            return Err(LoadError::NegativeValue {
                row,
                column: value_column.to_string(),
                value,
            });
        }

        let categories = dim_indices
            .iter()
            .map(|&idx| record.get(idx).unwrap_or_default().to_string())
            .collect();

        dataset.push(categories, value);
    }

    Ok(dataset)
}

/// Load one CSV file.
pub fn load_file(path: &Path, kind: DashboardKind) -> Result<Dataset, LoadError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(LoadError::NotFound(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    parse_csv(file, kind)
}

/// Try each candidate in order and fall back to the sample table.
pub fn load_with_fallback(candidates: &[PathBuf], kind: DashboardKind) -> LoadedDataset {
    let mut skipped = Vec::new();

    for path in candidates {
        match load_file(path, kind) {
            Ok(dataset) => {
                info!("Loaded {} rows from {}", dataset.len(), path.display());
                return LoadedDataset {
                    kind,
                    dataset,
                    source: DataSource::File(path.clone()),
                    skipped,
                    loaded_at: Utc::now(),
                };
            }
            Err(e) => {
                let malformed = !e.is_not_found();
                if malformed {
                    warn!("Skipping malformed data file {}: {}", path.display(), e);
                } else {
                    debug!("Data file not found: {}", path.display());
                }
                skipped.push(SkippedSource {
                    path: path.clone(),
                    reason: e.to_string(),
                    malformed,
                });
            }
        }
    }

    info!("No data file found; using sample data");

    LoadedDataset {
        kind,
        dataset: fallback_dataset(kind),
        source: DataSource::Fallback,
        skipped,
        loaded_at: Utc::now(),
    }
}

/// Load-once handle for a session's dataset.
///
/// The first call to [`DatasetCache::dataset`] runs the fallback chain;
/// every later call returns the same shared value.
#[derive(Debug)]
pub struct DatasetCache {
    kind: DashboardKind,
    candidates: Vec<PathBuf>,
    cell: OnceLock<Arc<LoadedDataset>>,
}

impl DatasetCache {
    pub fn new(kind: DashboardKind, candidates: Vec<PathBuf>) -> Self {
        Self {
            kind,
            candidates,
            cell: OnceLock::new(),
        }
    }

    pub fn kind(&self) -> DashboardKind {
        self.kind
    }

    /// The session dataset, loading it on first use.
    pub fn dataset(&self) -> Arc<LoadedDataset> {
        let loaded = self.cell.get_or_init(|| {
            debug!(
                "Loading {} dataset from {} candidate(s)",
                self.kind,
                self.candidates.len()
            );
            Arc::new(load_with_fallback(&self.candidates, self.kind))
        });
        Arc::clone(loaded)
    }
}
