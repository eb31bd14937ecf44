//! Logger metrics for observability
//!
//! Overload drops and sink failures are never reported per record; these
//! counters are where they show up instead.

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic delivery counters.
///
/// # Example
///
/// ```
/// use sinklog::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_dispatched();
/// metrics.record_dispatched();
/// metrics.record_dropped();
///
/// assert_eq!(metrics.dispatched_count(), 2);
/// assert_eq!(metrics.dropped_count(), 1);
/// assert_eq!(metrics.drop_rate(), 50.0);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Deliveries attempted (one per record per handler)
    dispatched: AtomicU64,

    /// Deliveries shed because a sink's queue was full or closed
    dropped: AtomicU64,

    /// Records that reached their sink
    written: AtomicU64,

    /// Writes the sink rejected
    write_failures: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            dispatched: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            written: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn dispatched_count(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn written_count(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    /// Returns the previous value.
    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.dispatched.fetch_add(1, Ordering::Relaxed)
    }

    /// Returns the previous value.
    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Dropped deliveries as a percentage (0.0 - 100.0) of dispatched ones.
    ///
    /// Returns 0.0 if nothing has been dispatched.
    pub fn drop_rate(&self) -> f64 {
        let dispatched = self.dispatched_count() as f64;
        if dispatched == 0.0 {
            0.0
        } else {
            (self.dropped_count() as f64 / dispatched) * 100.0
        }
    }

    pub fn reset(&self) {
        self.dispatched.store(0, Ordering::Relaxed);
        self.dropped.store(0, Ordering::Relaxed);
        self.written.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            dispatched: AtomicU64::new(self.dispatched_count()),
            dropped: AtomicU64::new(self.dropped_count()),
            written: AtomicU64::new(self.written_count()),
            write_failures: AtomicU64::new(self.write_failures()),
        }
    }
}

/// Whether the `n`th event (0-based previous count) deserves a stderr line:
/// the first one and every 1000th after it.
#[inline]
pub(crate) fn should_alert(previous: u64) -> bool {
    previous == 0 || (previous + 1) % 1000 == 0
}
