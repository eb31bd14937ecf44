//! syslog(3) transport

use super::syslog::{SyslogPriority, SyslogTransport};
use std::ffi::CString;
use std::io;
use std::sync::OnceLock;

/// Tag used when none is given, or when the given one contains a NUL byte.
pub const DEFAULT_SYSLOG_TAG: &str = "sinklog";

/// Connection to the local syslog daemon through libc.
///
/// The process has a single syslog connection; the first `UnixSyslog`
/// opened decides its tag. Dropping it calls `closelog(3)`, after which the
/// next `syslog(3)` call reopens the connection with default settings.
#[derive(Debug)]
pub struct UnixSyslog {
    _private: (),
}

impl UnixSyslog {
    pub fn open(tag: &str) -> Self {
        // openlog keeps the pointer, so the ident must live for the process.
        static IDENT: OnceLock<CString> = OnceLock::new();
        let ident = IDENT.get_or_init(|| {
            CString::new(tag).unwrap_or_else(|_| {
                CString::new(DEFAULT_SYSLOG_TAG).expect("default tag contains no NUL bytes")
            })
        });

        // SAFETY: ident is a valid C string stored in a static.
        unsafe {
            libc::openlog(ident.as_ptr(), libc::LOG_PID, libc::LOG_USER);
        }
        Self { _private: () }
    }
}

impl Default for UnixSyslog {
    fn default() -> Self {
        Self::open(DEFAULT_SYSLOG_TAG)
    }
}

impl SyslogTransport for UnixSyslog {
    fn send(&self, priority: SyslogPriority, message: &str) -> io::Result<()> {
        let message = message.strip_suffix('\n').unwrap_or(message);
        let message = CString::new(message)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        // "%s" keeps any '%' in the message from being read as a directive.
        // SAFETY: both pointers are valid NUL-terminated strings.
        unsafe {
            libc::syslog(priority.as_i32(), c"%s".as_ptr(), message.as_ptr());
        }
        Ok(())
    }
}

impl Drop for UnixSyslog {
    fn drop(&mut self) {
        // SAFETY: closelog has no preconditions.
        unsafe {
            libc::closelog();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SinkId;

    #[test]
    fn test_unix_syslog_rejects_interior_nul() {
        let syslog = UnixSyslog::open("sinklog-test");
        let err = syslog.send(SyslogPriority::Debug, "bad\0message").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert_eq!(syslog.sink_id(), SinkId::SYSLOG);
    }
}
