//! Request-scoped logging handles

use super::level::Level;
use super::logger::Logger;
use std::panic::Location;

/// Correlation ids that replace the logger's own for one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Correlation {
    pub(crate) rpc_id: Option<String>,
    pub(crate) request_id: Option<String>,
}

/// A borrowed view of a [`Logger`] carrying its own rpc and request ids.
///
/// Shares the logger's handlers, level and dispatch mode. The ids live only
/// in the handle, so any number of requests can log through one logger at
/// once without seeing each other's ids. An id not set on the handle falls
/// back to the logger's.
///
/// # Example
///
/// ```
/// use sinklog::prelude::*;
/// use std::sync::Arc;
///
/// let sink = Arc::new(WriterSink::new(Vec::new()));
/// let logger = Logger::builder()
///     .handler(StreamHandler::new(sink.clone(), "[{{rpc_id}} {{request_id}}] {{}}").unwrap())
///     .build();
///
/// let request = logger.with_rpc_id("0.1").with_request_id("req-7");
/// request.info("handled");
/// logger.info("idle");
///
/// let out = sink.with_writer(|buf| String::from_utf8(buf.clone()).unwrap());
/// assert_eq!(out, "[0.1 req-7] handled\n[- -] idle\n");
/// ```
#[derive(Debug, Clone)]
pub struct ScopedLogger<'a> {
    logger: &'a Logger,
    ids: Correlation,
}

impl<'a> ScopedLogger<'a> {
    pub(crate) fn new(logger: &'a Logger) -> Self {
        Self {
            logger,
            ids: Correlation::default(),
        }
    }

    #[must_use]
    pub fn with_rpc_id(mut self, rpc_id: impl Into<String>) -> Self {
        self.ids.rpc_id = Some(rpc_id.into());
        self
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.ids.request_id = Some(request_id.into());
        self
    }

    pub fn logger(&self) -> &'a Logger {
        self.logger
    }

    pub fn rpc_id(&self) -> String {
        match &self.ids.rpc_id {
            Some(id) => id.clone(),
            None => self.logger.rpc_id(),
        }
    }

    pub fn request_id(&self) -> String {
        match &self.ids.request_id {
            Some(id) => id.clone(),
            None => self.logger.request_id(),
        }
    }

    /// The underlying logger's effective level.
    #[inline]
    pub fn level(&self) -> Level {
        self.logger.level()
    }

    #[track_caller]
    pub fn log(&self, level: Level, message: impl Into<String>) {
        self.logger
            .log_scoped(level, message.into(), Location::caller(), &self.ids);
    }

    #[track_caller]
    pub fn print(&self, message: impl Into<String>) {
        self.logger
            .log_scoped(self.level(), message.into(), Location::caller(), &self.ids);
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

    /// See [`Logger::fatal`].
    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) -> ! {
        self.logger
            .fatal_scoped(message.into(), Location::caller(), &self.ids)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::config::test_support::lock_globals;
    use crate::core::{Level, Logger, WriterSink};
    use crate::handlers::StreamHandler;
    use std::sync::Arc;
    use std::thread;

    fn logger_with_buffer(template: &str) -> (Logger, Arc<WriterSink<Vec<u8>>>) {
        let sink = Arc::new(WriterSink::new(Vec::new()));
        let logger = Logger::builder()
            .name("scoped")
            .handler(StreamHandler::new(sink.clone(), template).unwrap())
            .build();
        (logger, sink)
    }

    fn lines(sink: &WriterSink<Vec<u8>>) -> Vec<String> {
        sink.with_writer(|buf| String::from_utf8_lossy(buf).lines().map(String::from).collect())
    }

    #[test]
    fn test_scoped_ids_do_not_touch_logger() {
        let _guard = lock_globals();
        let (logger, sink) = logger_with_buffer("[{{rpc_id}} {{request_id}}] {{}}");
        logger.set_request_id("base-req");

        let scoped = logger.with_rpc_id("0.1.2");
        scoped.info("scoped");
        logger.info("plain");

        assert_eq!(scoped.rpc_id(), "0.1.2");
        assert_eq!(scoped.request_id(), "base-req");
        assert_eq!(logger.rpc_id(), "");
        assert_eq!(lines(&sink), vec!["[0.1.2 base-req] scoped", "[- base-req] plain"]);
    }

    #[test]
    fn test_scoped_ids_override_logger_ids() {
        let _guard = lock_globals();
        let (logger, sink) = logger_with_buffer("[{{rpc_id}} {{request_id}}] {{}}");
        logger.set_rpc_id("base-rpc");

        logger
            .with_request_id("req-1")
            .with_rpc_id("override")
            .warn("both");

        assert_eq!(lines(&sink), vec!["[override req-1] both"]);
    }

    #[test]
    fn test_scoped_logger_follows_level() {
        let _guard = lock_globals();
        let (logger, sink) = logger_with_buffer("{{level}} {{}}");
        logger.set_level(Level::Warn);

        let scoped = logger.with_rpc_id("r");
        scoped.info("hidden");
        scoped.error("shown");
        scoped.print("printed");

        assert_eq!(scoped.level(), Level::Warn);
        assert_eq!(lines(&sink), vec!["ERRO shown", "WARN printed"]);
    }

    #[test]
    fn test_scoped_call_site() {
        let _guard = lock_globals();
        let (logger, sink) = logger_with_buffer("{{file_line}} {{}}");

        let line = line!() + 1;
        logger.with_rpc_id("r").info("here");

        assert_eq!(lines(&sink), vec![format!("scoped.rs:{} here", line)]);
    }

    #[test]
    fn test_concurrent_requests_keep_their_ids() {
        let _guard = lock_globals();
        let (logger, sink) = logger_with_buffer("{{rpc_id}} {{request_id}} {{}}");

        thread::scope(|scope| {
            for n in 0..4 {
                let logger = &logger;
                scope.spawn(move || {
                    let request = logger
                        .with_rpc_id(format!("rpc-{}", n))
                        .with_request_id(format!("req-{}", n));
                    for seq in 0..50 {
                        request.info(format!("{} {}", n, seq));
                    }
                });
            }
        });

        let lines = lines(&sink);
        assert_eq!(lines.len(), 200);
        for line in lines {
            let fields: Vec<&str> = line.split(' ').collect();
            let n = fields[2];
            assert_eq!(fields[0], format!("rpc-{}", n), "crossed ids: {}", line);
            assert_eq!(fields[1], format!("req-{}", n), "crossed ids: {}", line);
        }
    }
}
