//! Per-sink asynchronous workers
//!
//! Each sink gets one background thread fed by a bounded queue. Submitting
//! never blocks: when the queue is full the job is dropped and counted. The
//! worker runs jobs one at a time in FIFO order, so writes to a sink keep
//! their submission order and never overlap.

use super::error::{LoggerError, Result};
use super::handler::panic_message;
use super::metrics::{should_alert, LoggerMetrics};
use super::registry::Registry;
use super::sink::SinkId;
use crossbeam_channel::{bounded, Sender, TrySendError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};
use std::thread::{self, JoinHandle};

/// Queue capacity of each sink's worker in the process-wide registry.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100_000;

/// One unit of work: render and write a single record.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// What happened to a submitted job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Queued,
    /// The sink's queue was full; the job was discarded.
    Dropped,
}

struct SinkWorker {
    sender: Mutex<Option<Sender<Job>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl SinkWorker {
    fn start(sink: SinkId, capacity: usize) -> Self {
        let (sender, receiver) = bounded::<Job>(capacity);

        let spawned = thread::Builder::new()
            .name(format!("sinklog-{}", sink))
            .spawn(move || {
                // Ends once every sender is gone and the queue is drained.
                for job in receiver.iter() {
                    if let Err(panic_info) =
                        std::panic::catch_unwind(std::panic::AssertUnwindSafe(job))
                    {
                        eprintln!(
                            "[LOGGER CRITICAL] Job for {} panicked: {}. Worker continues.",
                            sink,
                            panic_message(panic_info.as_ref())
                        );
                    }
                }
            });

        match spawned {
            Ok(handle) => Self {
                sender: Mutex::new(Some(sender)),
                handle: Mutex::new(Some(handle)),
            },
            Err(e) => {
                eprintln!("[LOGGER ERROR] Failed to start worker for {}: {}", sink, e);
                Self::closed()
            }
        }
    }

    fn closed() -> Self {
        Self {
            sender: Mutex::new(None),
            handle: Mutex::new(None),
        }
    }

    fn push(&self, job: Job) -> std::result::Result<(), TrySendError<Job>> {
        match self.sender.lock().as_ref() {
            Some(sender) => sender.try_send(job),
            None => Err(TrySendError::Disconnected(job)),
        }
    }

    fn pending(&self) -> usize {
        self.sender.lock().as_ref().map_or(0, |s| s.len())
    }

    /// Block until every job queued so far has run.
    fn flush(&self) {
        let (done_tx, done_rx) = bounded::<()>(1);
        let barrier: Job = Box::new(move || {
            let _ = done_tx.send(());
        });
        let sender = match self.sender.lock().as_ref() {
            Some(sender) => sender.clone(),
            None => return,
        };
        // Blocking send: an explicit flush may wait for queue space.
        if sender.send(barrier).is_ok() {
            let _ = done_rx.recv();
        }
    }

    /// Stop accepting jobs, drain the queue, and join the thread.
    fn close(&self) {
        drop(self.sender.lock().take());

        let mut handle = self.handle.lock();
        if let Some(h) = handle.as_ref() {
            // A job that shuts the registry down cannot wait for itself.
            if h.thread().id() == thread::current().id() {
                return;
            }
        }
        if let Some(h) = handle.take() {
            if let Err(e) = h.join() {
                eprintln!("[LOGGER ERROR] Sink worker panicked during shutdown: {:?}", e);
            }
        }
    }
}

/// Registry of per-sink workers.
///
/// # Example
///
/// ```
/// use sinklog::core::{SinkId, SinkWorkers, Submission};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let workers = SinkWorkers::with_capacity(16);
/// let hits = Arc::new(AtomicUsize::new(0));
/// let sink = SinkId::unique();
///
/// let counter = Arc::clone(&hits);
/// let outcome = workers.submit(sink, Box::new(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// }));
/// assert_eq!(outcome.unwrap(), Submission::Queued);
///
/// workers.shutdown();
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
/// ```
pub struct SinkWorkers {
    workers: Registry<SinkId, Arc<SinkWorker>>,
    capacity: usize,
    closed: AtomicBool,
    metrics: LoggerMetrics,
}

impl SinkWorkers {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Registry whose per-sink queues hold at most `capacity` jobs.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            workers: Registry::new(),
            capacity: capacity.max(1),
            closed: AtomicBool::new(false),
            metrics: LoggerMetrics::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Queue `job` on `sink`'s worker, starting the worker on first use.
    ///
    /// Never blocks. A full queue drops the job and returns
    /// [`Submission::Dropped`]; a shut-down registry returns
    /// [`LoggerError::WorkersClosed`].
    pub fn submit(&self, sink: SinkId, job: Job) -> Result<Submission> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(LoggerError::WorkersClosed);
        }
        self.metrics.record_dispatched();

        let worker = self.workers.get_or_create(sink, || {
            // Runs under the registry write lock, so a shutdown that has
            // already flagged the registry cannot miss this worker.
            if self.closed.load(Ordering::SeqCst) {
                Arc::new(SinkWorker::closed())
            } else {
                Arc::new(SinkWorker::start(sink, self.capacity))
            }
        });

        match worker.push(job) {
            Ok(()) => Ok(Submission::Queued),
            Err(TrySendError::Full(_)) => {
                let previous = self.metrics.record_dropped();
                if should_alert(previous) {
                    eprintln!(
                        "[LOGGER WARNING] Queue for {} full, {} records dropped so far.",
                        sink,
                        previous + 1
                    );
                }
                Ok(Submission::Dropped)
            }
            Err(TrySendError::Disconnected(_)) => {
                self.metrics.record_dropped();
                Err(LoggerError::WorkersClosed)
            }
        }
    }

    /// Jobs waiting in `sink`'s queue.
    pub fn pending(&self, sink: SinkId) -> usize {
        self.workers.get(&sink).map_or(0, |w| w.pending())
    }

    /// Number of sinks that have a worker.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn dropped_count(&self) -> u64 {
        self.metrics.dropped_count()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Wait until every job submitted before this call has run. The registry
    /// stays open.
    pub fn flush(&self) {
        for worker in self.workers.values() {
            worker.flush();
        }
    }

    /// Like [`flush`](Self::flush), but only for `sink`. Other sinks' queues
    /// are not waited on.
    pub fn flush_sink(&self, sink: SinkId) {
        if let Some(worker) = self.workers.get(&sink) {
            worker.flush();
        }
    }

    /// Refuse further submissions, then wait for every worker to drain its
    /// queue and exit.
    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
        for worker in self.workers.values() {
            worker.close();
        }
    }
}

impl Default for SinkWorkers {
    fn default() -> Self {
        Self::new()
    }
}

static SINK_WORKERS: LazyLock<Arc<SinkWorkers>> =
    LazyLock::new(|| Arc::new(SinkWorkers::with_capacity(DEFAULT_QUEUE_CAPACITY)));

/// The process-wide worker registry used by async loggers.
pub fn sink_workers() -> Arc<SinkWorkers> {
    Arc::clone(&SINK_WORKERS)
}
