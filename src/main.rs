//! salesdash - interactive sales dashboards over CSV data
//!
//! Loads a sales table from the first readable CSV candidate (or built-in
//! sample data), then either serves an HTML dashboard with a minimum-sales
//! slider or renders a single report to a file.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Invalid arguments, bad config, or a server/runtime error

mod analysis;
mod cli;
mod config;
mod loader;
mod models;
mod report;
mod server;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use loader::DatasetCache;
use models::LoadedDataset;
use report::{render, RenderOptions};
use server::AppState;
use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    init_logging(log_level(&args, &config))?;

    info!("salesdash v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    if let Err(e) = run(args, config).await {
        error!("salesdash failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .salesdash.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize data files, server address, and slider step.");
    Ok(())
}

/// `--quiet` wins, then `--verbose` or `general.verbose`.
fn log_level(args: &Args, config: &Config) -> tracing::Level {
    if !args.quiet && config.general.verbose {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    }
}

/// Initialize logging. `RUST_LOG` takes precedence over the CLI level.
fn init_logging(level: tracing::Level) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(LevelFilter::from_level(level).into())
    });

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is set up, so problems with the default file are
/// reported on stderr.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("⚠️  Ignoring {}: {:#}", CONFIG_FILE, e);
            Ok(Config::default())
        }
    }
}

/// Load the dataset, then render once or serve.
async fn run(args: Args, config: Config) -> Result<()> {
    let kind = args.dashboard;
    let candidates = config.candidates_for(kind).to_vec();

    let state = Arc::new(AppState::new(
        DatasetCache::new(kind, candidates),
        config.filter.step,
        config.filter.min_sales,
        RenderOptions {
            title: config.general.title.clone(),
        },
        config.chart.style(),
    ));

    // Load eagerly so data problems surface at startup
    let loaded = state.cache.dataset();
    if !args.quiet {
        print_load_summary(&loaded);
    }

    if let Some(ref output_path) = args.output {
        let filter = state.filter_for(&loaded, None);
        let page = render(&loaded, &filter, &state.options);

        let output = match args.format {
            OutputFormat::Html => report::generate_html_report(&page, &state.chart),
            OutputFormat::Markdown => report::generate_markdown_report(&page),
            OutputFormat::Json => report::generate_json_report(&page)?,
        };

        std::fs::write(output_path, &output)
            .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

        if !args.quiet {
            println!(
                "\n✅ Dashboard rendered at {} ≥ {}. Saved to: {}",
                loaded.dataset.value_column,
                report::format_value(filter.threshold()),
                output_path.display()
            );
        }
        return Ok(());
    }

    let host = config.server.host.clone();
    let port = config.server.port;
    if !args.quiet {
        println!("\n🌐 Serving on http://{}:{}/ (Ctrl+C to stop)", host, port);
    }

    server::serve(state, &host, port).await
}

fn print_load_summary(loaded: &LoadedDataset) {
    println!("📊 Dashboard: {}", loaded.kind.title());
    println!("   Source: {}", loaded.source);
    println!("   Rows: {}", loaded.dataset.len());
    for skipped in loaded.malformed_sources() {
        println!(
            "   ⚠️  Skipped {}: {}",
            skipped.path.display(),
            skipped.reason
        );
    }
}
