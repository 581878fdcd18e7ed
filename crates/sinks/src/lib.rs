//! Unload - Sinks
//!
//! Consumers of a worker's row stream. Each worker owns exactly one sink for
//! its whole lifetime; the sink drains the worker's row channel and reports
//! once the channel closes.
//!
//! ```text
//! [Producer] --Record--> [capacity-1 channel] --> [Sink task] --> [files | digest]
//! ```
//!
//! # Available Sinks
//!
//! | Sink | Output |
//! |------|--------|
//! | `file` | Delimited text files with size-based rotation, optional gzip |
//! | `digest` | One md5/sha256 hex digest over all rows |
//!
//! # Example
//!
//! ```ignore
//! use unload_sinks::{FileSinkConfig, SinkConfig, SinkMetrics};
//! use tokio::sync::mpsc;
//!
//! let (tx, rx) = mpsc::channel(1);
//! let config = SinkConfig::File(FileSinkConfig::default().with_base_name("orders"));
//! let sink = config.build(Some(0), rx, metrics);
//! let handle = tokio::spawn(sink.run());
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use unload_protocol::Record;

/// Rotating file sink
pub mod file;

/// Streaming digest sink
pub mod digest;

/// Segment naming, byte-counting writer, gzip
pub mod util;

mod common;

pub use common::{MetricsSnapshot, Result, SinkError, SinkMetrics, SinkReport};
pub use digest::{DigestSink, DigestSinkConfig, DigestState};
pub use unload_protocol::HashAlgorithm;
pub use file::{FileSinkConfig, RotatingFileSink, SinkState};

/// Which sink every worker of a run gets
#[derive(Debug, Clone)]
pub enum SinkConfig {
    File(FileSinkConfig),
    Digest(DigestSinkConfig),
}

impl SinkConfig {
    /// Build one worker's sink over its row channel
    pub fn build(
        &self,
        worker: Option<usize>,
        receiver: mpsc::Receiver<Record>,
        metrics: Arc<SinkMetrics>,
    ) -> Sink {
        match self {
            Self::File(config) => Sink::File(RotatingFileSink::new(
                config.clone(),
                worker,
                receiver,
                metrics,
            )),
            Self::Digest(config) => {
                Sink::Digest(DigestSink::new(*config, worker, receiver, metrics))
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Digest(_) => "digest",
        }
    }
}

/// A built sink, ready to run on its own task
pub enum Sink {
    File(RotatingFileSink),
    Digest(DigestSink),
}

impl Sink {
    /// Drain the row channel to completion
    pub async fn run(self) -> Result<SinkReport> {
        match self {
            Self::File(sink) => sink.run().await,
            Self::Digest(sink) => sink.run().await,
        }
    }
}
