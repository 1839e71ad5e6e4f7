//! Logging setup.
//!
//! All log output goes through a [`LogSink`], a mutex-guarded writer shared by
//! the planner and every executor worker. Each formatted event is written while
//! holding the lock, so lines from concurrent copies never interleave.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

enum SinkTarget {
    Stderr(io::Stderr),
    Memory(Vec<u8>),
}

impl Write for SinkTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            SinkTarget::Stderr(w) => w.write(buf),
            SinkTarget::Memory(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            SinkTarget::Stderr(w) => w.flush(),
            SinkTarget::Memory(w) => w.flush(),
        }
    }
}

/// Thread-safe log destination. Cloning shares the same underlying writer.
#[derive(Clone)]
pub struct LogSink {
    target: Arc<Mutex<SinkTarget>>,
}

impl LogSink {
    /// Sink writing to standard error.
    pub fn stderr() -> Self {
        Self::from_target(SinkTarget::Stderr(io::stderr()))
    }

    /// Sink collecting output in memory, readable with [`LogSink::contents`].
    pub fn in_memory() -> Self {
        Self::from_target(SinkTarget::Memory(Vec::new()))
    }

    fn from_target(target: SinkTarget) -> Self {
        Self {
            target: Arc::new(Mutex::new(target)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SinkTarget> {
        // A panic while logging must not silence every later line.
        self.target.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Everything written so far, for in-memory sinks. Empty otherwise.
    pub fn contents(&self) -> String {
        match &*self.lock() {
            SinkTarget::Memory(buf) => String::from_utf8_lossy(buf).into_owned(),
            SinkTarget::Stderr(_) => String::new(),
        }
    }
}

impl std::fmt::Debug for LogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &*self.lock() {
            SinkTarget::Stderr(_) => "stderr",
            SinkTarget::Memory(_) => "memory",
        };
        f.debug_struct("LogSink").field("target", &kind).finish()
    }
}

/// Writer handed out per log event; holds the sink lock until dropped.
pub struct SinkWriter<'a> {
    guard: MutexGuard<'a, SinkTarget>,
}

impl Write for SinkWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.guard.flush()
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = SinkWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SinkWriter { guard: self.lock() }
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("h3a=debug")
    } else {
        EnvFilter::new("h3a=info")
    }
}

/// Build a subscriber that writes to `sink`.
///
/// Useful with `tracing::subscriber::with_default` to scope logging to a block.
pub fn subscriber(verbose: bool, sink: LogSink) -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_ansi(false)
                .with_writer(sink),
        )
        .with(env_filter(verbose))
}

/// Initialize the global logging system.
pub fn init_logging(verbose: bool, sink: LogSink) {
    subscriber(verbose, sink).init();
}
