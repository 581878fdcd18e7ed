//! Unload Configuration
//!
//! TOML-based configuration with defaults matching the classic export tool.
//! An empty file is valid; a run only needs a source url and a query, which
//! may also come from the command line.
//!
//! # Parsing
//!
//! ```
//! use unload_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[extract]\nparallel = 4").unwrap();
//! assert_eq!(config.extract.parallel, 4);
//! ```
//!
//! # Example Config
//!
//! ```toml
//! [source]
//! url = "sqlite://warehouse.db"
//! dialect = "sqlite"
//!
//! [extract]
//! query_file = "queries/orders.sql"
//! parallel = 4
//! range_start = 1
//! range_end = 2500000
//! batch_size = 100000
//!
//! [output]
//! delimiter = "comma"
//! compress = true
//! ```

mod error;
mod extract;
mod logging;
mod output;
mod source;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use error::{ConfigError, Result};
pub use extract::{DEFAULT_BATCH_SIZE, DEFAULT_PARALLEL, ExtractConfig};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use output::{
    DEFAULT_BUFFER_SIZE, DEFAULT_COMPRESSION_RATIO, DEFAULT_MAX_FILE_SIZE_MB,
    DEFAULT_SIZE_CHECK_INTERVAL, DigestConfig, OutputConfig,
};
pub use source::SourceConfig;

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,

    /// Database to read from
    pub source: SourceConfig,

    /// Query and partitioning
    pub extract: ExtractConfig,

    /// File naming, rotation and compression
    pub output: OutputConfig,

    /// Checksum mode settings
    pub digest: DigestConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, is not valid TOML, or holds
    /// out-of-range values.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;

        Self::from_str(&contents)
    }

    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Check that the configuration is complete enough to run
    ///
    /// Call after command line overrides have been applied.
    pub fn validate(&self) -> Result<()> {
        validation::validate_complete(self)
    }

    /// Query text, read from `query_file` when configured
    pub fn query_text(&self) -> Result<String> {
        self.extract.query_text()
    }

    /// Output path prefix
    ///
    /// `output.base_name` when set, otherwise the query file path without its
    /// extension, otherwise `"unload"`.
    pub fn base_name(&self) -> String {
        if let Some(base) = &self.output.base_name {
            return base.clone();
        }
        match &self.extract.query_file {
            Some(path) => path.with_extension("").to_string_lossy().into_owned(),
            None => "unload".to_string(),
        }
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
