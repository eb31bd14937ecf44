//! # sinklog
//!
//! A leveled logging library that renders records through text templates and
//! fans them out to any number of handlers.
//!
//! ## Features
//!
//! - **Templates**: `{{level}} {{date}} {{time}} {{name}} {{}}` style
//!   placeholders, compiled and checked once up front
//! - **Shared sinks**: handlers from different loggers can target the same
//!   stream without ever interleaving partial lines
//! - **Sync or async**: synchronous calls return after every handler has
//!   written; asynchronous calls queue per sink and shed load when full
//! - **Syslog**: priority-mapped syslog handler over a pluggable transport
//!
//! ## Example
//!
//! ```
//! use sinklog::prelude::*;
//!
//! let logger = Logger::builder()
//!     .name("api")
//!     .handler(StreamHandler::stdout("{{l}} {{time}} {{name}} {{}}").unwrap())
//!     .build();
//!
//! logger.set_rpc_id("0.1");
//! logger.info("ready");
//! sinklog::info!(logger, "listening on {}", 8080);
//! ```

pub mod core;
pub mod handlers;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        Formatter, Handler, Level, Logger, LoggerBuilder, LoggerConfig, LoggerError,
        LoggerMetrics, Record, Result, ScopedLogger, Sink, SinkId, StderrSink, StdoutSink,
        WriterSink,
    };
    pub use crate::handlers::{StreamHandler, SyslogHandler, SyslogPriority, SyslogTransport};
}

pub use core::{
    global_app_id, global_level, set_global_app_id, set_global_level, Formatter, Handler, Level,
    Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, Record, Result, ScopedLogger,
    Sink, SinkId, StderrSink, StdoutSink, WriterSink, DEFAULT_TEMPLATE, SYSLOG_TEMPLATE,
};
pub use handlers::{StreamHandler, SyslogHandler};

/// Write out every record still queued for asynchronous delivery and stop
/// the process-wide sink workers.
///
/// Asynchronous logging calls made afterwards are dropped. Call this once
/// on clean termination.
pub fn shutdown() {
    core::sink_workers().shutdown();
}
