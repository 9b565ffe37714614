//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::DashboardKind;
use clap::Parser;
use std::path::PathBuf;

/// salesdash - interactive sales dashboards over CSV data
///
/// Serves a dashboard with tables, charts and a minimum-sales slider.
/// Falls back to built-in sample data when no CSV file is found.
///
/// Examples:
///   salesdash
///   salesdash --dashboard prefectures --data prefecture_sales.csv
///   salesdash --dashboard prefectures --min-sales 200 --output report.md --format markdown
///   salesdash --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Which dashboard to serve
    #[arg(short, long, default_value = "products", value_name = "KIND")]
    pub dashboard: DashboardKind,

    /// CSV file to try, in order (repeatable)
    ///
    /// Replaces the default candidate list. The first file that loads wins;
    /// sample data is used when none do.
    #[arg(long, value_name = "PATH")]
    pub data: Vec<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .salesdash.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Bind address
    #[arg(long, value_name = "HOST", env = "SALESDASH_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, value_name = "PORT", env = "SALESDASH_PORT")]
    pub port: Option<u16>,

    /// Initial minimum-sales threshold
    ///
    /// Snapped onto the slider range; defaults to the smallest value.
    #[arg(long, value_name = "VALUE", allow_negative_numbers = true)]
    pub min_sales: Option<f64>,

    /// Slider step
    #[arg(long, value_name = "STEP")]
    pub step: Option<f64>,

    /// Dashboard title override
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Render once to this file instead of serving
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format for --output (html, markdown, json)
    #[arg(long, default_value = "html", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .salesdash.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for a one-shot render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Standalone HTML page (default)
    #[default]
    Html,
    /// Markdown format
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(step) = self.step {
            if !step.is_finite() || step <= 0.0 {
                return Err("Step must be a positive number".to_string());
            }
        }

        if let Some(min_sales) = self.min_sales {
            if !min_sales.is_finite() {
                return Err("Minimum sales must be a finite number".to_string());
            }
        }

        if self.port == Some(0) {
            return Err("Port must be between 1 and 65535".to_string());
        }

        if let Some(ref host) = self.host {
            if host.trim().is_empty() {
                return Err("Host must not be empty".to_string());
            }
        }

        if self.output.is_none() && self.format != OutputFormat::Html {
            return Err("--format only applies together with --output".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_defaults_validate() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "salesdash",
            "--dashboard",
            "prefectures",
            "--data",
            "a.csv",
            "--data",
            "b.csv",
            "--min-sales",
            "200",
            "--output",
            "out.json",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(args.dashboard, DashboardKind::Prefectures);
        assert_eq!(args.data, vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")]);
        assert_eq!(args.min_sales, Some(200.0));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_step() {
        let mut args = make_args();
        args.step = Some(0.0);
        assert!(args.validate().is_err());

        args.step = Some(f64::NAN);
        assert!(args.validate().is_err());

        args.step = Some(5.0);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_port_and_host() {
        let mut args = make_args();
        args.port = Some(0);
        assert!(args.validate().is_err());

        args.port = Some(8080);
        args.host = Some("  ".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_format_without_output() {
        let mut args = make_args();
        args.format = OutputFormat::Markdown;
        assert!(args.validate().is_err());

        args.output = Some(PathBuf::from("report.md"));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
