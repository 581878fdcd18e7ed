//! Scheduler metrics
//!
//! Atomic counters updated by the scheduler and its workers. Relaxed
//! ordering; values are read once the run has joined every worker.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one scheduled run
#[derive(Debug, Default)]
pub struct SchedulerMetrics {
    /// Workers that connected and ran their session statements
    workers_connected: AtomicU64,

    /// Workers that failed to connect
    connect_failures: AtomicU64,

    /// Ranges sent on the partition channel
    ranges_dispatched: AtomicU64,

    /// Ranges whose query ran to completion
    ranges_completed: AtomicU64,

    /// Ranges whose query or cursor failed
    ranges_failed: AtomicU64,
}

impl SchedulerMetrics {
    pub const fn new() -> Self {
        Self {
            workers_connected: AtomicU64::new(0),
            connect_failures: AtomicU64::new(0),
            ranges_dispatched: AtomicU64::new(0),
            ranges_completed: AtomicU64::new(0),
            ranges_failed: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn worker_connected(&self) {
        self.workers_connected.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn connect_failed(&self) {
        self.connect_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn range_dispatched(&self) {
        self.ranges_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn range_completed(&self) {
        self.ranges_completed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn range_failed(&self) {
        self.ranges_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            workers_connected: self.workers_connected.load(Ordering::Relaxed),
            connect_failures: self.connect_failures.load(Ordering::Relaxed),
            ranges_dispatched: self.ranges_dispatched.load(Ordering::Relaxed),
            ranges_completed: self.ranges_completed.load(Ordering::Relaxed),
            ranges_failed: self.ranges_failed.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of scheduler metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub workers_connected: u64,
    pub connect_failures: u64,
    pub ranges_dispatched: u64,
    pub ranges_completed: u64,
    pub ranges_failed: u64,
}
