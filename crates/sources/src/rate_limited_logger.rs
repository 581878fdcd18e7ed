//! Rate-limited warning logger
//!
//! Per-row scan failures can repeat for every row of a corrupt column.
//! Logs at most once per interval and reports how many were suppressed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Default interval between warnings
pub const DEFAULT_LOG_INTERVAL: Duration = Duration::from_secs(10);

/// Logs at most once per `min_interval`
pub struct RateLimitedLogger {
    min_interval: Duration,
    last_log_time: Mutex<Option<Instant>>,
    pending: AtomicU64,
    total: AtomicU64,
}

impl RateLimitedLogger {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_log_time: Mutex::new(None),
            pending: AtomicU64::new(0),
            total: AtomicU64::new(0),
        }
    }

    /// Record a warning, emitting it if the interval has elapsed
    ///
    /// Returns true if the warning was logged.
    pub fn warn(&self, message: &str, error: &dyn std::fmt::Display, worker: usize) -> bool {
        self.pending.fetch_add(1, Ordering::Relaxed);
        let total = self.total.fetch_add(1, Ordering::Relaxed) + 1;

        if !self.due() {
            return false;
        }

        let count = self.pending.swap(0, Ordering::Relaxed);
        if count > 1 {
            tracing::warn!(
                worker,
                error = %error,
                suppressed_count = count - 1,
                total,
                "{message} (rate-limited)"
            );
        } else {
            tracing::warn!(worker, error = %error, total, "{message}");
        }
        true
    }

    fn due(&self) -> bool {
        let mut last = self.last_log_time.lock();
        let now = Instant::now();
        match *last {
            Some(prev) if now.duration_since(prev) < self.min_interval => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }

    /// Warnings recorded since the last emitted one
    pub fn pending_count(&self) -> u64 {
        self.pending.load(Ordering::Relaxed)
    }

    /// All warnings ever recorded
    pub fn total_count(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }
}

impl Default for RateLimitedLogger {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_warning_logs() {
        let logger = RateLimitedLogger::new(Duration::from_secs(10));
        assert!(logger.warn("bad row", &"cannot parse", 1));
        assert_eq!(logger.total_count(), 1);
        assert_eq!(logger.pending_count(), 0);
    }

    #[test]
    fn test_rapid_warnings_suppressed() {
        let logger = RateLimitedLogger::new(Duration::from_secs(10));
        assert!(logger.warn("bad row", &"x", 1));
        for _ in 0..5 {
            assert!(!logger.warn("bad row", &"x", 1));
        }
        assert_eq!(logger.total_count(), 6);
        assert_eq!(logger.pending_count(), 5);
    }

    #[test]
    fn test_zero_interval_always_logs() {
        let logger = RateLimitedLogger::new(Duration::ZERO);
        assert!(logger.warn("bad row", &"x", 0));
        assert!(logger.warn("bad row", &"x", 0));
        assert_eq!(logger.pending_count(), 0);
    }
}
