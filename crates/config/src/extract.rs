//! Extraction configuration: query, parallelism, partitioning

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Default number of workers
pub const DEFAULT_PARALLEL: usize = 1;

/// Default partition width
pub const DEFAULT_BATCH_SIZE: u64 = unload_protocol::DEFAULT_BATCH_SIZE;

/// What to extract and how to split it
///
/// The query is either inline (`query`) or read from `query_file`. Ranged
/// queries take the partition bounds as positional parameters.
///
/// ```toml
/// [extract]
/// query_file = "orders.sql"
/// parallel = 4
/// range_start = 1
/// range_end = 1000000
/// batch_size = 50000
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub query: Option<String>,
    pub query_file: Option<PathBuf>,
    pub parallel: usize,
    pub range_start: Option<i64>,
    pub range_end: Option<i64>,
    pub batch_size: u64,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            query: None,
            query_file: None,
            parallel: DEFAULT_PARALLEL,
            range_start: None,
            range_end: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ExtractConfig {
    /// Partition bounds, if both were given
    pub fn range(&self) -> Option<(i64, i64)> {
        match (self.range_start, self.range_end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// Resolve the query text, reading `query_file` when set
    pub fn query_text(&self) -> Result<String> {
        match (&self.query, &self.query_file) {
            (Some(query), None) => Ok(query.clone()),
            (None, Some(path)) => read_query(path),
            (Some(_), Some(_)) => Err(ConfigError::invalid_value(
                "extract",
                "query",
                "set either query or query_file, not both",
            )),
            (None, None) => Err(ConfigError::missing_field("extract", "query")),
        }
    }
}

fn read_query(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    let text = text.trim().trim_end_matches(';').trim_end();
    if text.is_empty() {
        return Err(ConfigError::invalid_value(
            "extract",
            "query_file",
            format!("'{}' is empty", path.display()),
        ));
    }
    Ok(text.to_string())
}
