//! Handler that writes rendered records to a byte sink

use crate::core::formatter::Formatter;
use crate::core::handler::{deliver, Handler};
use crate::core::metrics::LoggerMetrics;
use crate::core::record::Record;
use crate::core::sink::{Sink, SinkId, StderrSink, StdoutSink};
use crate::core::Result;
use std::fmt;
use std::io;
use std::sync::Arc;

/// Renders records with a [`Formatter`] and writes them to one [`Sink`].
///
/// Colouring defaults to on when the sink is a terminal. Use
/// [`with_colored`](Self::with_colored) to force it either way.
///
/// # Example
///
/// ```
/// use sinklog::core::{Handler, Level, Record, WriterSink};
/// use sinklog::handlers::StreamHandler;
/// use std::sync::Arc;
///
/// let sink = Arc::new(WriterSink::new(Vec::new()));
/// let handler = StreamHandler::new(sink.clone(), "{{l}}: {{}}").unwrap();
///
/// handler.log(&Record::new("app", Level::Warn, "WarnLog"));
/// assert_eq!(sink.with_writer(|buf| buf.clone()), b"W: WarnLog\n");
/// ```
pub struct StreamHandler {
    name: String,
    sink: Arc<dyn Sink>,
    formatter: Formatter,
    metrics: LoggerMetrics,
}

impl StreamHandler {
    pub fn new(sink: Arc<dyn Sink>, template: &str) -> Result<Self> {
        let formatter = Formatter::new(template, sink.is_terminal())?;
        Ok(Self {
            name: format!("stream:{}", sink.id()),
            sink,
            formatter,
            metrics: LoggerMetrics::new(),
        })
    }

    /// Handler on the process's standard output.
    pub fn stdout(template: &str) -> Result<Self> {
        Self::new(Arc::new(StdoutSink), template)
    }

    /// Handler on the process's standard error.
    pub fn stderr(template: &str) -> Result<Self> {
        Self::new(Arc::new(StderrSink), template)
    }

    /// Override terminal detection.
    #[must_use]
    pub fn with_colored(mut self, colored: bool) -> Self {
        self.formatter.set_colored(colored);
        self
    }

    pub fn colored(&self) -> bool {
        self.formatter.colored()
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    pub fn sink(&self) -> &Arc<dyn Sink> {
        &self.sink
    }

    /// Write outcomes for this handler.
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }
}

impl Handler for StreamHandler {
    fn log(&self, record: &Record) {
        let line = self.formatter.format(record);
        deliver(self.sink.id(), &self.metrics, || self.sink.write(line.as_bytes()));
    }

    fn sink_id(&self) -> SinkId {
        self.sink.id()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn flush(&self) -> io::Result<()> {
        self.sink.flush()
    }
}

impl fmt::Debug for StreamHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamHandler")
            .field("sink", &self.sink.id())
            .field("colored", &self.formatter.colored())
            .finish()
    }
}
