//! Source metrics shared by all workers of a run

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated by connections and producers
#[derive(Debug, Default)]
pub struct SourceMetrics {
    /// Connections opened
    pub connections: AtomicU64,

    /// Queries started
    pub queries: AtomicU64,

    /// Rows fetched from cursors
    pub rows_fetched: AtomicU64,

    /// Rows replaced by an empty-filled row after a scan failure
    pub rows_substituted: AtomicU64,

    /// Query and cursor failures
    pub errors: AtomicU64,
}

impl SourceMetrics {
    pub const fn new() -> Self {
        Self {
            connections: AtomicU64::new(0),
            queries: AtomicU64::new(0),
            rows_fetched: AtomicU64::new(0),
            rows_substituted: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn connection_opened(&self) {
        self.connections.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn query_started(&self) {
        self.queries.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn row_fetched(&self) {
        self.rows_fetched.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn row_substituted(&self) {
        self.rows_substituted.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections: self.connections.load(Ordering::Relaxed),
            queries: self.queries.load(Ordering::Relaxed),
            rows_fetched: self.rows_fetched.load(Ordering::Relaxed),
            rows_substituted: self.rows_substituted.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub connections: u64,
    pub queries: u64,
    pub rows_fetched: u64,
    pub rows_substituted: u64,
    pub errors: u64,
}
