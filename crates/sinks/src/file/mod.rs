//! Rotating File Sink
//!
//! Writes delimited records to a numbered sequence of files and starts a new
//! file once the current one approaches the size threshold.
//!
//! # Output Files
//!
//! ```text
//! exports/orders_0000001.tsv        # whole-table / single worker
//! exports/orders_2_0000001.csv.gz   # worker 2, compressed
//! ```
//!
//! # Rotation
//!
//! The size is checked every `size_check_interval` rows. When compression is
//! on, the threshold applies to the compressed file, so the written byte
//! count is discounted by `compression_ratio` before comparing against 95% of
//! `max_file_size_mb`. Closed files are gzipped to `.gz` and the plain file is
//! removed. The next file is opened lazily on the next row, so a sink that
//! receives no rows creates no files.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use unload_protocol::{Delimiter, Record, join_record};

use crate::common::{Result, SinkError, SinkMetrics, SinkReport};
use crate::util::{SegmentWriter, compress_file, segment_path};

/// Default write buffer per open file
pub const DEFAULT_BUFFER_SIZE: usize = 256 * 1024;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Fraction of the threshold that triggers rotation
const ROTATION_HEADROOM: f64 = 0.95;

/// Configuration for the rotating file sink
#[derive(Debug, Clone)]
pub struct FileSinkConfig {
    /// Output path prefix
    pub base_name: String,

    pub delimiter: Delimiter,

    /// Target size of each file (after compression when `compress` is on)
    pub max_file_size_mb: u64,

    pub compress: bool,

    /// Rows written between size checks
    pub size_check_interval: u64,

    /// Expected compressed size relative to plain text
    pub compression_ratio: f64,

    pub buffer_size: usize,
}

impl Default for FileSinkConfig {
    fn default() -> Self {
        Self {
            base_name: "unload".into(),
            delimiter: Delimiter::Tab,
            max_file_size_mb: 250,
            compress: false,
            size_check_interval: 1000,
            compression_ratio: 0.11,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl FileSinkConfig {
    #[must_use]
    pub fn with_base_name(mut self, base_name: impl Into<String>) -> Self {
        self.base_name = base_name.into();
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_max_file_size_mb(mut self, mb: u64) -> Self {
        self.max_file_size_mb = mb;
        self
    }

    #[must_use]
    pub fn with_compression(mut self) -> Self {
        self.compress = true;
        self
    }

    #[must_use]
    pub fn with_size_check_interval(mut self, rows: u64) -> Self {
        self.size_check_interval = rows;
        self
    }

    /// Whether a file holding `bytes` plain bytes should be rotated
    pub fn exceeds_threshold(&self, bytes: u64) -> bool {
        let ratio = if self.compress {
            self.compression_ratio
        } else {
            1.0
        };
        let effective_mb = bytes as f64 / BYTES_PER_MB * ratio;
        effective_mb >= self.max_file_size_mb as f64 * ROTATION_HEADROOM
    }
}

/// Mutable rotation state, owned by the sink's task
#[derive(Default)]
pub struct SinkState {
    current: Option<SegmentWriter>,
    /// Last sequence number used; the first file is 1
    sequence: u64,
    rows_since_check: u64,
}

impl SinkState {
    /// Plain bytes in the open file
    pub fn bytes_written_estimate(&self) -> u64 {
        self.current.as_ref().map_or(0, SegmentWriter::bytes_written)
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }
}

/// Rotating file sink for one worker
pub struct RotatingFileSink {
    name: String,
    worker: Option<usize>,
    config: FileSinkConfig,
    receiver: mpsc::Receiver<Record>,
    state: SinkState,
    metrics: Arc<SinkMetrics>,
    files: Vec<PathBuf>,
    rows: u64,
    bytes: u64,
}

impl RotatingFileSink {
    /// Create a sink; `worker` is `None` when no worker suffix is wanted
    pub fn new(
        config: FileSinkConfig,
        worker: Option<usize>,
        receiver: mpsc::Receiver<Record>,
        metrics: Arc<SinkMetrics>,
    ) -> Self {
        let name = match worker {
            Some(id) => format!("file-{id}"),
            None => "file".to_string(),
        };
        Self {
            name,
            worker,
            config,
            receiver,
            state: SinkState::default(),
            metrics,
            files: Vec::new(),
            rows: 0,
            bytes: 0,
        }
    }

    /// Consume the row channel until it closes
    ///
    /// Returns once every received row is on disk and the last file is
    /// closed. Failing to create a file ends the sink with an error; write,
    /// close and compression failures are logged and counted.
    pub async fn run(mut self) -> Result<SinkReport> {
        tracing::debug!(sink = %self.name, base = %self.config.base_name, "file sink starting");

        while let Some(record) = self.receiver.recv().await {
            self.write_record(&record).await?;
        }
        self.close_current().await;

        tracing::info!(
            sink = %self.name,
            rows = self.rows,
            bytes = self.bytes,
            files = self.files.len(),
            "file sink finished"
        );

        Ok(SinkReport {
            worker: self.worker,
            rows: self.rows,
            bytes: self.bytes,
            files: self.files,
            digest: None,
        })
    }

    async fn write_record(&mut self, record: &[String]) -> Result<()> {
        if !self.state.is_open() {
            self.open_next().await?;
        }
        let line = join_record(record, self.config.delimiter);

        if let Some(writer) = self.state.current.as_mut() {
            match writer.write_all(line.as_bytes()).await {
                Ok(()) => {
                    let len = line.len() as u64;
                    self.rows += 1;
                    self.bytes += len;
                    self.metrics.row_written(len);
                }
                Err(source) => {
                    self.metrics.write_error();
                    let err = SinkError::Write {
                        path: writer.path().to_path_buf(),
                        source,
                    };
                    tracing::error!(sink = %self.name, error = %err, "row write failed");
                }
            }
        }

        self.state.rows_since_check += 1;
        if self.state.rows_since_check >= self.config.size_check_interval {
            self.state.rows_since_check = 0;
            if self.config.exceeds_threshold(self.state.bytes_written_estimate()) {
                self.close_current().await;
            }
        }
        Ok(())
    }

    async fn open_next(&mut self) -> Result<()> {
        self.state.sequence += 1;
        let path = segment_path(
            &self.config.base_name,
            self.worker,
            self.state.sequence,
            self.config.delimiter,
        );
        let writer = SegmentWriter::create(path.clone(), self.config.buffer_size)
            .await
            .map_err(|source| SinkError::Create { path, source })?;

        tracing::debug!(sink = %self.name, path = %writer.path().display(), "opened file");
        self.state.rows_since_check = 0;
        self.state.current = Some(writer);
        Ok(())
    }

    /// Close the open file, compressing it when configured
    async fn close_current(&mut self) {
        let Some(writer) = self.state.current.take() else {
            return;
        };
        let bytes = writer.bytes_written();
        let open_path = writer.path().to_path_buf();

        let path = match writer.finish().await {
            Ok(path) => path,
            Err(source) => {
                self.metrics.write_error();
                let err = SinkError::Write {
                    path: open_path.clone(),
                    source,
                };
                tracing::error!(sink = %self.name, error = %err, "failed to close file");
                open_path
            }
        };

        let path = if self.config.compress {
            match compress_file(path.clone()).await {
                Ok(gz) => gz,
                Err(source) => {
                    self.metrics.write_error();
                    let err = SinkError::Compress {
                        path: path.clone(),
                        source,
                    };
                    tracing::error!(sink = %self.name, error = %err, "compression failed, keeping plain file");
                    path
                }
            }
        } else {
            path
        };

        self.metrics.file_closed();
        tracing::info!(sink = %self.name, path = %path.display(), bytes, "closed file");
        self.files.push(path);
    }
}
