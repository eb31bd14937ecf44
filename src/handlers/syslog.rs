//! Handler that forwards records to a syslog transport

use crate::core::formatter::{Formatter, SYSLOG_TEMPLATE};
use crate::core::handler::{deliver, Handler};
use crate::core::level::Level;
use crate::core::metrics::LoggerMetrics;
use crate::core::record::Record;
use crate::core::sink::SinkId;
use crate::core::Result;
use std::fmt;
use std::io;
use std::sync::Arc;

/// Syslog severities, numbered as in `<syslog.h>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i32)]
pub enum SyslogPriority {
    Emergency = 0,
    Alert = 1,
    Critical = 2,
    Error = 3,
    Warning = 4,
    Notice = 5,
    Info = 6,
    Debug = 7,
}

impl SyslogPriority {
    /// Fatal records go out as `Critical`. `Unset` never reaches a handler
    /// through a logger and is sent as `Debug`.
    pub fn from_level(level: Level) -> Self {
        match level {
            Level::Unset | Level::Debug => SyslogPriority::Debug,
            Level::Info => SyslogPriority::Info,
            Level::Warn => SyslogPriority::Warning,
            Level::Error => SyslogPriority::Error,
            Level::Fatal => SyslogPriority::Critical,
        }
    }

    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// Something that can deliver a single message at a syslog priority.
pub trait SyslogTransport: Send + Sync {
    fn send(&self, priority: SyslogPriority, message: &str) -> io::Result<()>;

    /// All transports default to the one process-wide syslog identity.
    fn sink_id(&self) -> SinkId {
        SinkId::SYSLOG
    }
}

/// Renders records and hands them to a [`SyslogTransport`].
///
/// Output is never coloured.
pub struct SyslogHandler {
    transport: Arc<dyn SyslogTransport>,
    formatter: Formatter,
    metrics: LoggerMetrics,
}

impl SyslogHandler {
    /// Uses [`SYSLOG_TEMPLATE`].
    pub fn new(transport: Arc<dyn SyslogTransport>) -> Result<Self> {
        Self::with_format(transport, SYSLOG_TEMPLATE)
    }

    pub fn with_format(transport: Arc<dyn SyslogTransport>, template: &str) -> Result<Self> {
        Ok(Self {
            transport,
            formatter: Formatter::new(template, false)?,
            metrics: LoggerMetrics::new(),
        })
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }
}

impl Handler for SyslogHandler {
    fn log(&self, record: &Record) {
        let message = self.formatter.format(record);
        let priority = SyslogPriority::from_level(record.level());
        deliver(self.transport.sink_id(), &self.metrics, || {
            self.transport.send(priority, &message)
        });
    }

    fn sink_id(&self) -> SinkId {
        self.transport.sink_id()
    }

    fn name(&self) -> &str {
        "syslog"
    }
}

impl fmt::Debug for SyslogHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyslogHandler")
            .field("sink", &self.transport.sink_id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        id: Option<SinkId>,
        sent: Mutex<Vec<(SyslogPriority, String)>>,
    }

    impl SyslogTransport for Recorder {
        fn send(&self, priority: SyslogPriority, message: &str) -> io::Result<()> {
            self.sent.lock().push((priority, message.to_string()));
            Ok(())
        }

        fn sink_id(&self) -> SinkId {
            self.id.unwrap_or(SinkId::SYSLOG)
        }
    }

    #[test]
    fn test_priority_mapping() {
        assert_eq!(SyslogPriority::from_level(Level::Debug), SyslogPriority::Debug);
        assert_eq!(SyslogPriority::from_level(Level::Info), SyslogPriority::Info);
        assert_eq!(SyslogPriority::from_level(Level::Warn), SyslogPriority::Warning);
        assert_eq!(SyslogPriority::from_level(Level::Error), SyslogPriority::Error);
        assert_eq!(SyslogPriority::from_level(Level::Fatal), SyslogPriority::Critical);
        assert_eq!(SyslogPriority::Warning.as_i32(), 4);
    }

    #[test]
    fn test_default_template_with_empty_fields() {
        let transport = Arc::new(Recorder {
            id: Some(SinkId::unique()),
            ..Default::default()
        });
        let handler = SyslogHandler::new(transport.clone()).unwrap();

        let record = Record::new("svc", Level::Info, "InfoLog").with_app_id("");
        handler.log(&record);

        let record = Record::new("svc", Level::Error, "ErrLog")
            .with_app_id("billing")
            .with_rpc_id("0.1")
            .with_request_id("req-9");
        handler.log(&record);

        let sent = transport.sent.lock();
        assert_eq!(
            *sent,
            vec![
                (SyslogPriority::Info, "[- - -] ## InfoLog\n".to_string()),
                (SyslogPriority::Error, "[billing 0.1 req-9] ## ErrLog\n".to_string()),
            ]
        );
        assert_eq!(handler.metrics().written_count(), 2);
    }

    #[test]
    fn test_custom_format_is_never_coloured() {
        let transport = Arc::new(Recorder::default());
        let handler = SyslogHandler::with_format(transport, "{{level}} {{}}").unwrap();
        assert!(!handler.formatter().colored());
        assert_eq!(handler.sink_id(), SinkId::SYSLOG);
        assert_eq!(handler.name(), "syslog");
    }
}
