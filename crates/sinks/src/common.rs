//! Common types and utilities for sinks
//!
//! Shared functionality across both sink types.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

/// Result type for sink operations
pub type Result<T> = std::result::Result<T, SinkError>;

/// Metrics shared by all sinks of a run
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Records received from producers
    pub rows_written: AtomicU64,

    /// Bytes written or hashed, before compression
    pub bytes_written: AtomicU64,

    /// Output files closed
    pub files_closed: AtomicU64,

    /// Write, close and compression errors
    pub write_errors: AtomicU64,
}

impl SinkMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            rows_written: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            files_closed: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
        }
    }

    /// Record one written row
    #[inline]
    pub fn row_written(&self, bytes: u64) {
        self.rows_written.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    #[inline]
    pub fn file_closed(&self) {
        self.files_closed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn write_error(&self) {
        self.write_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            rows_written: self.rows_written.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            files_closed: self.files_closed.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of sink metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub rows_written: u64,
    pub bytes_written: u64,
    pub files_closed: u64,
    pub write_errors: u64,
}

/// What one sink produced over its lifetime
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SinkReport {
    /// Worker that owned the sink, `None` for whole-table runs
    pub worker: Option<usize>,

    /// Rows consumed from the channel
    pub rows: u64,

    /// Bytes written or hashed, before compression
    pub bytes: u64,

    /// Output files in sequence order (final paths, `.gz` when compressed)
    pub files: Vec<PathBuf>,

    /// Hex digest, digest sinks only
    pub digest: Option<String>,
}

/// Sink errors
#[derive(Debug, Error)]
pub enum SinkError {
    /// Could not create the next output file
    #[error("failed to create '{path}': {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Could not write to an output file
    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Could not gzip a closed file
    #[error("failed to compress '{path}': {source}")]
    Compress {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SinkError {
    /// Path of the file involved
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Create { path, .. } | Self::Write { path, .. } | Self::Compress { path, .. } => {
                path
            }
        }
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod common_test;
