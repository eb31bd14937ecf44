//! Per-sink write locks
//!
//! At most one write is in flight per [`SinkId`] at any instant, across every
//! handler and every logger in the process. Each sink gets exactly one mutex
//! for the life of the process, so handlers can come and go against the same
//! destination without ever losing mutual exclusion.

use super::registry::Registry;
use super::sink::SinkId;
use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex};
use std::sync::{Arc, LazyLock};

type SinkMutex = Arc<Mutex<()>>;

/// Holds exclusive access to one sink. Dropping it releases the sink.
#[must_use = "the sink is released as soon as the guard is dropped"]
pub struct SinkGuard {
    sink: SinkId,
    _guard: ArcMutexGuard<RawMutex, ()>,
}

impl SinkGuard {
    pub fn sink(&self) -> SinkId {
        self.sink
    }

    /// Release the sink explicitly.
    pub fn release(self) {}
}

pub struct SinkLocks {
    locks: Registry<SinkId, SinkMutex>,
}

impl SinkLocks {
    pub fn new() -> Self {
        Self {
            locks: Registry::new(),
        }
    }

    /// Block until the caller has exclusive access to `sink`.
    pub fn acquire(&self, sink: SinkId) -> SinkGuard {
        let lock = self.locks.get_or_create(sink, || Arc::new(Mutex::new(())));
        SinkGuard {
            sink,
            _guard: lock.lock_arc(),
        }
    }

    /// Like [`acquire`](Self::acquire) but gives up if the sink is busy.
    pub fn try_acquire(&self, sink: SinkId) -> Option<SinkGuard> {
        let lock = self.locks.get_or_create(sink, || Arc::new(Mutex::new(())));
        lock.try_lock_arc().map(|guard| SinkGuard {
            sink,
            _guard: guard,
        })
    }

    /// Number of distinct sinks seen so far.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl Default for SinkLocks {
    fn default() -> Self {
        Self::new()
    }
}

static SINK_LOCKS: LazyLock<SinkLocks> = LazyLock::new(SinkLocks::new);

/// The process-wide lock registry used by every handler.
pub fn sink_locks() -> &'static SinkLocks {
    &SINK_LOCKS
}
