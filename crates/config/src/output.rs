//! Output configuration: file rotation and digest

use serde::Deserialize;
use unload_protocol::{Delimiter, HashAlgorithm, QuoteScope};

/// Default rotation threshold in megabytes
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 250;

/// Rows written between size checks
pub const DEFAULT_SIZE_CHECK_INTERVAL: u64 = 1000;

/// Expected gzip output size relative to the plain text
pub const DEFAULT_COMPRESSION_RATIO: f64 = 0.11;

/// Default write buffer per open file
pub const DEFAULT_BUFFER_SIZE: usize = 256 * 1024;

/// Rotating file output
///
/// ```toml
/// [output]
/// base_name = "exports/orders"
/// max_file_size_mb = 100
/// delimiter = "comma"
/// compress = true
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output path prefix; defaults to the query file without extension
    pub base_name: Option<String>,

    /// Rotation threshold, measured after compression when `compress` is on
    pub max_file_size_mb: u64,

    pub delimiter: Delimiter,

    /// Quote and escape text and temporal fields
    pub quote: bool,

    pub quote_scope: QuoteScope,

    /// Gzip each file once it is closed
    pub compress: bool,

    pub size_check_interval: u64,

    pub compression_ratio: f64,

    pub buffer_size: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_name: None,
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
            delimiter: Delimiter::default(),
            quote: true,
            quote_scope: QuoteScope::default(),
            compress: false,
            size_check_interval: DEFAULT_SIZE_CHECK_INTERVAL,
            compression_ratio: DEFAULT_COMPRESSION_RATIO,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Checksum configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    pub algorithm: HashAlgorithm,
}
