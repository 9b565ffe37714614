//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.salesdash.toml` files.

use crate::analysis::DEFAULT_STEP;
use crate::models::DashboardKind;
use crate::report::ChartStyle;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = ".salesdash.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Data file candidates.
    #[serde(default)]
    pub data: DataConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Slider settings.
    #[serde(default)]
    pub filter: FilterConfig,

    /// Chart settings.
    #[serde(default)]
    pub chart: ChartConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Dashboard title override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Candidate CSV files per dashboard, tried in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_products")]
    pub products: Vec<PathBuf>,

    #[serde(default = "default_prefectures")]
    pub prefectures: Vec<PathBuf>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            products: default_products(),
            prefectures: default_prefectures(),
        }
    }
}

fn default_products() -> Vec<PathBuf> {
    DashboardKind::Products.default_candidates()
}

fn default_prefectures() -> Vec<PathBuf> {
    DashboardKind::Prefectures.default_candidates()
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

/// Minimum-sales slider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Slider step.
    #[serde(default = "default_step")]
    pub step: f64,

    /// Initial threshold; the dataset minimum when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_sales: Option<f64>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            step: default_step(),
            min_sales: None,
        }
    }
}

fn default_step() -> f64 {
    DEFAULT_STEP
}

/// Chart size in pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_width() -> u32 {
    640
}

fn default_height() -> u32 {
    360
}

impl ChartConfig {
    pub fn style(&self) -> ChartStyle {
        ChartStyle {
            width: f64::from(self.width),
            height: f64::from(self.height),
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.filter.step.is_finite() || self.filter.step <= 0.0 {
            anyhow::bail!("filter.step must be a positive number");
        }
        if self.server.port == 0 {
            anyhow::bail!("server.port must be between 1 and 65535");
        }
        if self.chart.width == 0 || self.chart.height == 0 {
            anyhow::bail!("chart.width and chart.height must be non-zero");
        }
        Ok(())
    }

    /// Candidate files for a dashboard, in the order they are tried.
    pub fn candidates_for(&self, kind: DashboardKind) -> &[PathBuf] {
        match kind {
            DashboardKind::Products => &self.data.products,
            DashboardKind::Prefectures => &self.data.prefectures,
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        // Explicit data files replace the candidates of the selected dashboard
        if !args.data.is_empty() {
            match args.dashboard {
                DashboardKind::Products => self.data.products = args.data.clone(),
                DashboardKind::Prefectures => self.data.prefectures = args.data.clone(),
            }
        }

        if let Some(ref host) = args.host {
            self.server.host = host.clone();
        }
        if let Some(port) = args.port {
            self.server.port = port;
        }

        if let Some(step) = args.step {
            self.filter.step = step;
        }
        if let Some(min_sales) = args.min_sales {
            self.filter.min_sales = Some(min_sales);
        }

        if let Some(ref title) = args.title {
            self.general.title = Some(title.clone());
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Args, OutputFormat};
    use std::io::Write;

    fn make_args() -> Args {
        Args {
            dashboard: DashboardKind::Prefectures,
            data: vec![],
            config: None,
            host: None,
            port: None,
            min_sales: None,
            step: None,
            title: None,
            output: None,
            format: OutputFormat::Html,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8501);
        assert_eq!(config.filter.step, 10.0);
        assert_eq!(config.chart.style(), ChartStyle::default());
        assert_eq!(
            config.candidates_for(DashboardKind::Prefectures)[0],
            PathBuf::from("prefecture_sales.csv")
        );
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
title = "Regional sales"
verbose = true

[data]
prefectures = ["exports/latest.csv"]

[server]
port = 9000

[filter]
step = 25.0
min_sales = 200.0
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.title.as_deref(), Some("Regional sales"));
        assert!(config.general.verbose);
        assert_eq!(
            config.candidates_for(DashboardKind::Prefectures),
            &[PathBuf::from("exports/latest.csv")]
        );
        assert_eq!(config.data.products, default_products());
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.filter.step, 25.0);
        assert_eq!(config.filter.min_sales, Some(200.0));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[filter]\nstep = 0.0").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("filter.step"));
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        let mut args = make_args();
        args.data = vec![PathBuf::from("mine.csv")];
        args.port = Some(8080);
        args.min_sales = Some(180.0);
        args.title = Some("Custom".to_string());

        config.merge_with_args(&args);

        assert_eq!(config.data.prefectures, vec![PathBuf::from("mine.csv")]);
        assert_eq!(config.data.products, default_products());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.filter.min_sales, Some(180.0));
        assert_eq!(config.general.title.as_deref(), Some("Custom"));
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[data]"));
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("[filter]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.server.port, 8501);
    }
}
