//! Output sinks and their identities
//!
//! A [`SinkId`] names a physical destination. Handlers that write to the same
//! destination report the same id, which is what the per-sink lock and worker
//! registries key on. The standard streams have fixed ids, so every stdout
//! handler in the process shares one identity no matter who created it.

use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a destination that must not receive interleaved writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SinkId(u64);

// Ids below this are reserved for well-known process streams.
const FIRST_DYNAMIC_ID: u64 = 16;
static NEXT_SINK_ID: AtomicU64 = AtomicU64::new(FIRST_DYNAMIC_ID);

impl SinkId {
    pub const STDOUT: SinkId = SinkId(1);
    pub const STDERR: SinkId = SinkId(2);
    pub const SYSLOG: SinkId = SinkId(3);

    /// Allocate an id no other sink in this process has.
    pub fn unique() -> SinkId {
        SinkId(NEXT_SINK_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SinkId::STDOUT => write!(f, "stdout"),
            SinkId::STDERR => write!(f, "stderr"),
            SinkId::SYSLOG => write!(f, "syslog"),
            SinkId(n) => write!(f, "sink#{}", n),
        }
    }
}

/// A byte destination for rendered records.
///
/// Implementations may perform a record's write in several steps; callers
/// serialize access per [`Sink::id`], so a sink does not have to.
pub trait Sink: Send + Sync {
    fn id(&self) -> SinkId;

    /// Write one rendered record.
    fn write(&self, buf: &[u8]) -> io::Result<()>;

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }

    /// Whether the destination is an interactive terminal, used to decide
    /// colouring when a handler is created.
    fn is_terminal(&self) -> bool {
        false
    }
}

/// The process's standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn id(&self) -> SinkId {
        SinkId::STDOUT
    }

    fn write(&self, buf: &[u8]) -> io::Result<()> {
        io::stdout().lock().write_all(buf)
    }

    fn flush(&self) -> io::Result<()> {
        io::stdout().flush()
    }

    fn is_terminal(&self) -> bool {
        io::stdout().is_terminal()
    }
}

/// The process's standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl Sink for StderrSink {
    fn id(&self) -> SinkId {
        SinkId::STDERR
    }

    fn write(&self, buf: &[u8]) -> io::Result<()> {
        io::stderr().lock().write_all(buf)
    }

    fn flush(&self) -> io::Result<()> {
        io::stderr().flush()
    }

    fn is_terminal(&self) -> bool {
        io::stderr().is_terminal()
    }
}

/// Adapts any [`Write`] into a sink with its own fresh identity.
///
/// Share one `Arc<WriterSink<_>>` between handlers to make them share the
/// identity; two separately constructed `WriterSink`s never do.
///
/// # Example
///
/// ```
/// use sinklog::core::{Sink, WriterSink};
///
/// let sink = WriterSink::new(Vec::new());
/// sink.write(b"hello\n").unwrap();
/// assert_eq!(sink.with_writer(|buf| buf.clone()), b"hello\n");
/// ```
pub struct WriterSink<W> {
    id: SinkId,
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            id: SinkId::unique(),
            writer: Mutex::new(writer),
        }
    }

    /// Run `f` with exclusive access to the wrapped writer.
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        f(&mut self.writer.lock())
    }

    pub fn lock(&self) -> MutexGuard<'_, W> {
        self.writer.lock()
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn id(&self) -> SinkId {
        self.id
    }

    fn write(&self, buf: &[u8]) -> io::Result<()> {
        self.writer.lock().write_all(buf)
    }

    fn flush(&self) -> io::Result<()> {
        self.writer.lock().flush()
    }
}

impl<W> fmt::Debug for WriterSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterSink").field("id", &self.id).finish()
    }
}
