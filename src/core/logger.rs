//! Main logger implementation

use super::{
    config::{self, LoggerConfig},
    error::{LoggerError, Result},
    formatter::DEFAULT_TEMPLATE,
    handler::{call_handler, Handler},
    level::{Level, DEFAULT_LEVEL},
    metrics::{should_alert, LoggerMetrics},
    record::Record,
    scoped::{Correlation, ScopedLogger},
    sink::{Sink, SinkId, StdoutSink},
    sink_workers::{sink_workers, Job, SinkWorkers, Submission},
};
use crate::handlers::StreamHandler;
use parking_lot::RwLock;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use std::thread;

struct LoggerState {
    level: Level,
    handlers: Vec<Arc<dyn Handler>>,
    rpc_id: String,
    request_id: String,
    async_mode: bool,
    report_caller: bool,
}

impl Default for LoggerState {
    fn default() -> Self {
        Self {
            level: Level::Unset,
            handlers: Vec::new(),
            rpc_id: String::new(),
            request_id: String::new(),
            async_mode: false,
            report_caller: true,
        }
    }
}

/// A named logger fanning records out to a set of handlers.
///
/// All methods take `&self`; a logger is meant to be shared (usually behind
/// an `Arc`) by any number of threads. Configuration changes and logging
/// calls may run concurrently. A call observes the mode and handler set in
/// effect when it starts.
///
/// In synchronous mode a logging call returns once every handler has written
/// the record. In asynchronous mode it queues one job per handler on that
/// handler's sink worker and returns immediately; records that do not fit in
/// a full queue are dropped and counted in [`metrics`](Self::metrics).
pub struct Logger {
    name: String,
    state: RwLock<LoggerState>,
    workers: Arc<SinkWorkers>,
    metrics: LoggerMetrics,
}

impl Logger {
    /// Logger with a single handler on standard output using
    /// [`DEFAULT_TEMPLATE`].
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_sink(name, Arc::new(StdoutSink))
    }

    /// Logger with a single handler on `sink` using [`DEFAULT_TEMPLATE`].
    pub fn with_sink(name: impl Into<String>, sink: Arc<dyn Sink>) -> Self {
        let handler = StreamHandler::new(sink, DEFAULT_TEMPLATE)
            .expect("default template always compiles");
        Self::builder().name(name).handler(handler).build()
    }

    /// Logger described by `config`, writing to `sink`.
    pub fn from_config(config: &LoggerConfig, sink: Arc<dyn Sink>) -> Result<Self> {
        config.validate()?;

        let mut handler = StreamHandler::new(sink, &config.template)?;
        if let Some(colored) = config.colored {
            handler = handler.with_colored(colored);
        }

        let mut builder = Self::builder()
            .name(config.name.as_str())
            .level(config.parsed_level()?)
            .handler(handler)
            .async_mode(config.async_mode)
            .report_caller(config.report_caller);
        if let Some(capacity) = config.queue_capacity {
            builder = builder.sink_workers(Arc::new(SinkWorkers::with_capacity(capacity)));
        }
        Ok(builder.build())
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The effective level: the process-wide override if set, else this
    /// logger's own level if set, else [`DEFAULT_LEVEL`].
    #[inline]
    pub fn level(&self) -> Level {
        let global = config::global_level();
        if global.is_set() {
            return global;
        }
        let own = self.state.read().level;
        if own.is_set() {
            own
        } else {
            DEFAULT_LEVEL
        }
    }

    /// This logger's own level, ignoring the process-wide override.
    pub fn own_level(&self) -> Level {
        self.state.read().level
    }

    /// [`Level::Unset`] defers to the process-wide and built-in defaults.
    pub fn set_level(&self, level: Level) {
        self.state.write().level = level;
    }

    /// Attach `handler`. Attaching a handler that is already attached does
    /// nothing.
    pub fn add_handler(&self, handler: Arc<dyn Handler>) {
        let mut state = self.state.write();
        if !state.handlers.iter().any(|h| same_handler(h, &handler)) {
            state.handlers.push(handler);
        }
    }

    /// Detach `handler`. Returns whether it was attached.
    pub fn remove_handler(&self, handler: &Arc<dyn Handler>) -> bool {
        let mut state = self.state.write();
        let before = state.handlers.len();
        state.handlers.retain(|h| !same_handler(h, handler));
        state.handlers.len() != before
    }

    /// Snapshot of the attached handlers.
    pub fn handlers(&self) -> Vec<Arc<dyn Handler>> {
        self.state.read().handlers.clone()
    }

    pub fn set_rpc_id(&self, rpc_id: impl Into<String>) {
        self.state.write().rpc_id = rpc_id.into();
    }

    pub fn rpc_id(&self) -> String {
        self.state.read().rpc_id.clone()
    }

    pub fn set_request_id(&self, request_id: impl Into<String>) {
        self.state.write().request_id = request_id.into();
    }

    pub fn request_id(&self) -> String {
        self.state.read().request_id.clone()
    }

    /// A handle that logs through this logger with its own rpc id. Use it
    /// for per-request ids on a shared logger instead of
    /// [`set_rpc_id`](Self::set_rpc_id).
    pub fn with_rpc_id(&self, rpc_id: impl Into<String>) -> ScopedLogger<'_> {
        ScopedLogger::new(self).with_rpc_id(rpc_id)
    }

    /// A handle that logs through this logger with its own request id.
    pub fn with_request_id(&self, request_id: impl Into<String>) -> ScopedLogger<'_> {
        ScopedLogger::new(self).with_request_id(request_id)
    }

    /// Switch between synchronous and asynchronous dispatch. Takes effect
    /// for calls that start after it returns.
    pub fn set_async(&self, async_mode: bool) {
        self.state.write().async_mode = async_mode;
    }

    pub fn is_async(&self) -> bool {
        self.state.read().async_mode
    }

    /// Whether records carry the caller's file and line.
    pub fn set_report_caller(&self, report_caller: bool) {
        self.state.write().report_caller = report_caller;
    }

    pub fn reports_caller(&self) -> bool {
        self.state.read().report_caller
    }

    /// Delivery counters for this logger. Write outcomes are counted by each
    /// handler.
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// The worker registry used in asynchronous mode.
    pub fn sink_workers(&self) -> &Arc<SinkWorkers> {
        &self.workers
    }

    #[track_caller]
    pub fn log(&self, level: Level, message: impl Into<String>) {
        self.log_scoped(level, message.into(), Location::caller(), &Correlation::default());
    }

    /// Log at whatever the effective level currently is.
    #[track_caller]
    pub fn print(&self, message: impl Into<String>) {
        self.log_scoped(
            self.level(),
            message.into(),
            Location::caller(),
            &Correlation::default(),
        );
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::Debug, message);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::Info, message);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(Level::Warn, message);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::Error, message);
    }

    /// Write every queued record, then write a [`Level::Fatal`] record to
    /// all handlers and exit the process with status 1.
    ///
    /// The fatal record is written synchronously whatever the dispatch mode,
    /// so it cannot be dropped by a full queue or a shut-down registry. It
    /// lands after everything queued before it.
    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) -> ! {
        self.fatal_scoped(message.into(), Location::caller(), &Correlation::default())
    }

    /// Wait for this logger's queued records to be written, then flush every
    /// handler. Queues of sinks this logger does not write to are not
    /// waited on.
    pub fn flush(&self) -> Result<()> {
        let handlers = self.handlers();
        let mut sinks: Vec<SinkId> = handlers.iter().map(|h| h.sink_id()).collect();
        sinks.sort_unstable();
        sinks.dedup();
        for sink in sinks {
            self.workers.flush_sink(sink);
        }

        for handler in handlers {
            handler
                .flush()
                .map_err(|e| LoggerError::io_operation("flushing", handler.name(), e))?;
        }
        Ok(())
    }

    pub(crate) fn log_scoped(
        &self,
        level: Level,
        message: String,
        location: &'static Location<'static>,
        ids: &Correlation,
    ) {
        if level < self.level() {
            return;
        }
        self.output(level, message, location, ids, false);
    }

    pub(crate) fn fatal_scoped(
        &self,
        message: String,
        location: &'static Location<'static>,
        ids: &Correlation,
    ) -> ! {
        // Drain first so earlier async records keep their place ahead of
        // the fatal one.
        self.workers.shutdown();
        let global = sink_workers();
        if !Arc::ptr_eq(&self.workers, &global) {
            global.shutdown();
        }

        self.output(Level::Fatal, message, location, ids, true);

        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush before exit: {}", e);
        }
        std::process::exit(1);
    }

    fn output(
        &self,
        level: Level,
        message: String,
        location: &'static Location<'static>,
        ids: &Correlation,
        force_sync: bool,
    ) {
        let (record, handlers, async_mode) = {
            let state = self.state.read();
            if state.handlers.is_empty() {
                return;
            }
            let rpc_id = ids.rpc_id.as_deref().unwrap_or(state.rpc_id.as_str());
            let request_id = ids.request_id.as_deref().unwrap_or(state.request_id.as_str());
            let mut record = Record::new(self.name.as_str(), level, message)
                .with_rpc_id(rpc_id)
                .with_request_id(request_id);
            if state.report_caller {
                record = record.with_location(location);
            }
            (record, state.handlers.clone(), state.async_mode && !force_sync)
        };

        if async_mode {
            self.dispatch_async(Arc::new(record), &handlers);
        } else {
            self.dispatch_sync(&record, &handlers);
        }
    }

    /// One thread per handler; returns when the slowest one finishes.
    fn dispatch_sync(&self, record: &Record, handlers: &[Arc<dyn Handler>]) {
        for _ in handlers {
            self.metrics.record_dispatched();
        }

        if let [handler] = handlers {
            call_handler(handler.as_ref(), record);
            return;
        }

        thread::scope(|scope| {
            for handler in handlers {
                let handler = handler.as_ref();
                let spawned = thread::Builder::new()
                    .spawn_scoped(scope, move || call_handler(handler, record));
                if let Err(e) = spawned {
                    eprintln!(
                        "[LOGGER ERROR] Failed to spawn dispatch thread for {}: {}",
                        handler.name(),
                        e
                    );
                    call_handler(handler, record);
                }
            }
        });
    }

    fn dispatch_async(&self, record: Arc<Record>, handlers: &[Arc<dyn Handler>]) {
        for handler in handlers {
            self.metrics.record_dispatched();

            let job_handler = Arc::clone(handler);
            let job_record = Arc::clone(&record);
            let job: Job = Box::new(move || job_handler.log(&job_record));

            match self.workers.submit(handler.sink_id(), job) {
                Ok(Submission::Queued) => {}
                Ok(Submission::Dropped) => {
                    self.metrics.record_dropped();
                }
                Err(e) => {
                    let previous = self.metrics.record_dropped();
                    if should_alert(previous) {
                        eprintln!(
                            "[LOGGER WARNING] Logger '{}' dropped a record for {}: {}",
                            self.name,
                            handler.sink_id(),
                            e
                        );
                    }
                }
            }
        }
    }
}

fn same_handler(a: &Arc<dyn Handler>, b: &Arc<dyn Handler>) -> bool {
    // Compare data pointers only; vtable pointers may differ for one object.
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &state.level)
            .field("handlers", &state.handlers.len())
            .field("async_mode", &state.async_mode)
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// A built logger has exactly the handlers given to the builder, possibly
/// none. Use [`Logger::new`] for the standard-output default.
///
/// # Example
/// ```
/// use sinklog::prelude::*;
///
/// let logger = Logger::builder()
///     .name("api")
///     .level(Level::Debug)
///     .handler(StreamHandler::stderr("{{l}} {{name}} {{}}").unwrap())
///     .async_mode(true)
///     .build();
///
/// assert_eq!(logger.name(), "api");
/// assert!(logger.is_async());
/// ```
pub struct LoggerBuilder {
    name: String,
    level: Level,
    handlers: Vec<Arc<dyn Handler>>,
    async_mode: bool,
    rpc_id: String,
    request_id: String,
    report_caller: bool,
    workers: Option<Arc<SinkWorkers>>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        let defaults = LoggerState::default();
        Self {
            name: String::new(),
            level: defaults.level,
            handlers: defaults.handlers,
            async_mode: defaults.async_mode,
            rpc_id: defaults.rpc_id,
            request_id: defaults.request_id,
            report_caller: defaults.report_caller,
            workers: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn handler<H: Handler + 'static>(self, handler: H) -> Self {
        self.shared_handler(Arc::new(handler))
    }

    /// Attach a handler that other loggers may also hold.
    #[must_use = "builder methods return a new value"]
    pub fn shared_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        if !self.handlers.iter().any(|h| same_handler(h, &handler)) {
            self.handlers.push(handler);
        }
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn async_mode(mut self, async_mode: bool) -> Self {
        self.async_mode = async_mode;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn rpc_id(mut self, rpc_id: impl Into<String>) -> Self {
        self.rpc_id = rpc_id.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn report_caller(mut self, report_caller: bool) -> Self {
        self.report_caller = report_caller;
        self
    }

    /// Use `workers` instead of the process-wide registry.
    #[must_use = "builder methods return a new value"]
    pub fn sink_workers(mut self, workers: Arc<SinkWorkers>) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn build(self) -> Logger {
        Logger {
            name: self.name,
            state: RwLock::new(LoggerState {
                level: self.level,
                handlers: self.handlers,
                rpc_id: self.rpc_id,
                request_id: self.request_id,
                async_mode: self.async_mode,
                report_caller: self.report_caller,
            }),
            workers: self.workers.unwrap_or_else(sink_workers),
            metrics: LoggerMetrics::new(),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
