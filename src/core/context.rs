//! Per-run execution context.

use crate::logging::{self, LogSink};
use std::time::Duration;
use tracing::Dispatch;

/// Settings shared by the planner and executor for one run.
///
/// Planner and executor log through the subscriber built here, so every line
/// they emit, including lines from worker threads, lands in `log_sink`.
#[derive(Debug, Clone)]
pub struct Context {
    /// Log per-item details instead of showing a progress bar.
    pub verbose: bool,
    /// Requested number of concurrent copies.
    pub threads: usize,
    /// Destination for log output.
    pub log_sink: LogSink,
    /// Pause inside each copy before it starts. Only used by tests.
    pub item_delay: Option<Duration>,
    dispatch: Dispatch,
}

impl Context {
    pub fn new(verbose: bool, threads: usize, log_sink: LogSink) -> Self {
        let dispatch = Dispatch::new(logging::subscriber(verbose, log_sink.clone()));
        Self {
            verbose,
            threads,
            log_sink,
            item_delay: None,
            dispatch,
        }
    }

    /// Set a delay applied to every copy.
    pub fn with_item_delay(mut self, delay: Duration) -> Self {
        self.item_delay = Some(delay);
        self
    }

    /// Subscriber that writes to this run's log sink.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }
}
