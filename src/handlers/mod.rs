//! Handler implementations

pub mod stream;
pub mod syslog;

#[cfg(all(unix, feature = "syslog"))]
pub mod unix_syslog;

pub use stream::StreamHandler;
pub use syslog::{SyslogHandler, SyslogPriority, SyslogTransport};

#[cfg(all(unix, feature = "syslog"))]
pub use unix_syslog::{UnixSyslog, DEFAULT_SYSLOG_TAG};

pub use crate::core::Handler;
