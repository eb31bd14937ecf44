//! Core logger types and traits

pub mod config;
pub mod error;
pub mod formatter;
pub mod handler;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod record;
pub mod registry;
pub mod scoped;
pub mod sink;
pub mod sink_locks;
pub mod sink_workers;

pub use config::{global_app_id, global_level, set_global_app_id, set_global_level, LoggerConfig};
pub use error::{LoggerError, Result};
pub use formatter::{Formatter, Tag, DEFAULT_TEMPLATE, EMPTY_FIELD, SYSLOG_TEMPLATE};
pub use handler::Handler;
pub use level::{Level, DEFAULT_LEVEL};
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use record::Record;
pub use registry::Registry;
pub use scoped::ScopedLogger;
pub use sink::{Sink, SinkId, StderrSink, StdoutSink, WriterSink};
pub use sink_locks::{sink_locks, SinkGuard, SinkLocks};
pub use sink_workers::{sink_workers, Job, SinkWorkers, Submission, DEFAULT_QUEUE_CAPACITY};
