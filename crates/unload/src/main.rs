//! Unload - Partitioned table extraction
//!
//! # Usage
//!
//! ```bash
//! # Whole table to orders_0000001.tsv, orders_0000002.tsv, ...
//! unload export --url sqlite://warehouse.db --query-file orders.sql
//!
//! # Ranged, four workers, gzipped CSV
//! unload export --config unload.toml --parallel 4 \
//!     --range-start 1 --range-end 2500000 --delimiter comma --compress
//!
//! # Checksum instead of files
//! unload checksum --config unload.toml --algorithm sha256
//! ```

mod cmd;

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use unload_config::{Config, LogFormat};

/// Unload - Extract large tables to delimited files or a checksum
#[derive(Parser, Debug)]
#[command(name = "unload")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write rows to rotating CSV/TSV files
    Export(cmd::export::ExportArgs),

    /// Compute a digest over all rows instead of writing files
    Checksum(cmd::checksum::ChecksumArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.log.level.as_str().to_string());
    init_logging(&log_level, config.log.format)?;

    match cli.command {
        Command::Export(args) => cmd::export::run(args, config).await,
        Command::Checksum(args) => cmd::checksum::run(args, config).await,
    }
}

/// Load the config file when given, otherwise start from defaults
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(Config::default()),
    }
}

/// Initialize the tracing subscriber, logging to stderr
fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Console => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }

    Ok(())
}
