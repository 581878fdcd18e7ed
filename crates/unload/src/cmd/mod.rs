//! Command implementations for the unload CLI

pub mod checksum;
pub mod export;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use unload_config::Config;
use unload_pipeline::{Extraction, OutputMode, Params, RunReport};
use unload_protocol::{Delimiter, Dialect};
use unload_sources::{Connector, MemoryConnector, MemoryTable, SourceError};

/// Rows served by a bare `memory:` url
const DEFAULT_MEMORY_ROWS: i64 = 1000;

/// Source and partitioning flags shared by every command
#[derive(Args, Debug, Default)]
pub struct ExtractArgs {
    /// Source connection url (sqlite://path.db, memory:ROWS)
    #[arg(long)]
    url: Option<String>,

    /// Source dialect (oracle, snowflake, sqlite); inferred from the url when absent
    #[arg(long)]
    dialect: Option<Dialect>,

    /// Query text
    #[arg(short, long, conflicts_with = "query_file")]
    query: Option<String>,

    /// File holding the query text
    #[arg(long)]
    query_file: Option<PathBuf>,

    /// Number of workers for ranged extraction
    #[arg(short, long)]
    parallel: Option<usize>,

    /// First partition key (inclusive)
    #[arg(long, requires = "range_end")]
    range_start: Option<i64>,

    /// Last partition key (inclusive)
    #[arg(long, requires = "range_start")]
    range_end: Option<i64>,

    /// Keys per range
    #[arg(long)]
    batch_size: Option<u64>,

    /// Field delimiter (tab, comma)
    #[arg(short, long)]
    delimiter: Option<Delimiter>,
}

impl ExtractArgs {
    /// Overlay the flags that were given onto the config
    pub fn apply(self, config: &mut Config) {
        if let Some(url) = self.url {
            config.source.url = url;
        }
        if let Some(dialect) = self.dialect {
            config.source.dialect = Some(dialect);
        }
        if let Some(query) = self.query {
            config.extract.query = Some(query);
            config.extract.query_file = None;
        }
        if let Some(path) = self.query_file {
            config.extract.query_file = Some(path);
            config.extract.query = None;
        }
        if let Some(parallel) = self.parallel {
            config.extract.parallel = parallel;
        }
        if let (Some(start), Some(end)) = (self.range_start, self.range_end) {
            config.extract.range_start = Some(start);
            config.extract.range_end = Some(end);
        }
        if let Some(batch_size) = self.batch_size {
            config.extract.batch_size = batch_size;
        }
        if let Some(delimiter) = self.delimiter {
            config.output.delimiter = delimiter;
        }
    }
}

/// Resolve the config into parameters, pick a connector by url and run
pub async fn run_extraction(config: &Config, mode: OutputMode) -> Result<RunReport> {
    let params = Params::from_config(config, mode).context("invalid configuration")?;
    let url = config.source.url.as_str();

    if let Some(rows) = url.strip_prefix("memory:") {
        let rows = if rows.is_empty() {
            DEFAULT_MEMORY_ROWS
        } else {
            rows.parse()
                .with_context(|| format!("invalid row count in '{url}'"))?
        };
        return execute(MemoryConnector::new(MemoryTable::sequential(rows)), params).await;
    }

    #[cfg(feature = "sqlite")]
    if unload_sources::SqliteConnector::accepts(url) {
        let connector = unload_sources::SqliteConnector::new(url)?;
        return execute(connector, params).await;
    }

    Err(SourceError::UnsupportedUrl(url.to_string()).into())
}

async fn execute<K>(connector: K, params: Params) -> Result<RunReport>
where
    K: Connector + 'static,
    K::Connection: 'static,
{
    let report = Extraction::new(connector, params)
        .run()
        .await
        .context("extraction failed")?;

    let failed: Vec<String> = report
        .failures()
        .filter_map(|w| {
            w.failure
                .as_ref()
                .map(|e| format!("worker {}: {}", w.worker, e))
        })
        .collect();
    if !failed.is_empty() {
        bail!(
            "{} worker(s) failed after writing {} rows: {}",
            failed.len(),
            report.rows(),
            failed.join("; ")
        );
    }

    if report.substituted() > 0 {
        tracing::warn!(
            rows = report.substituted(),
            "rows could not be converted and were written empty"
        );
    }
    Ok(report)
}
