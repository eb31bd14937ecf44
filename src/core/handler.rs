//! Handler trait for log output destinations

use super::metrics::{should_alert, LoggerMetrics};
use super::record::Record;
use super::sink::SinkId;
use super::sink_locks::sink_locks;
use std::any::Any;
use std::io;

/// Renders a [`Record`] and delivers it to exactly one sink.
///
/// `log` returns only once the write has completed or failed. Failures are
/// absorbed: logging never reports a broken sink back to the caller.
pub trait Handler: Send + Sync {
    fn log(&self, record: &Record);

    /// Identity of the sink this handler writes to. Fixed for the handler's
    /// lifetime.
    fn sink_id(&self) -> SinkId;

    fn name(&self) -> &str;

    /// Push anything the sink buffers out to its destination.
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `write` while holding `sink`'s process-wide lock and account for the
/// outcome in `metrics`.
///
/// A failed write produces at most a rate-limited line on stderr, and none
/// at all when stderr is the sink that failed.
pub fn deliver(sink: SinkId, metrics: &LoggerMetrics, write: impl FnOnce() -> io::Result<()>) {
    let result = {
        let _guard = sink_locks().acquire(sink);
        write()
    };

    match result {
        Ok(()) => {
            metrics.record_written();
        }
        Err(e) => {
            let previous = metrics.record_write_failure();
            if sink != SinkId::STDERR && should_alert(previous) {
                eprintln!(
                    "[LOGGER ERROR] Write to {} failed ({} failures so far): {}",
                    sink,
                    previous + 1,
                    e
                );
            }
        }
    }
}

/// Run one handler, containing any panic it raises.
pub(crate) fn call_handler(handler: &dyn Handler, record: &Record) {
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| handler.log(record)));
    if let Err(panic_info) = outcome {
        eprintln!(
            "[LOGGER CRITICAL] Handler {} panicked: {}. Other handlers continue to function.",
            handler.name(),
            panic_message(panic_info.as_ref())
        );
    }
}

pub(crate) fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deliver_counts_outcomes() {
        let metrics = LoggerMetrics::new();
        let sink = SinkId::unique();

        deliver(sink, &metrics, || Ok(()));
        deliver(sink, &metrics, || {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        });

        assert_eq!(metrics.written_count(), 1);
        assert_eq!(metrics.write_failures(), 1);
    }

    #[test]
    fn test_panic_message() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42u8), "Unknown panic");
    }

    #[test]
    fn test_deliver_holds_sink_lock() {
        let metrics = LoggerMetrics::new();
        let sink = SinkId::unique();

        deliver(sink, &metrics, || {
            assert!(sink_locks().try_acquire(sink).is_none());
            Ok(())
        });
        assert!(sink_locks().try_acquire(sink).is_some());
    }
}
