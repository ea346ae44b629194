//! Progress reporting
//!
//! Workers report through a [`ProgressAggregator`], which owns the completion
//! counter and publishes to a [`ProgressSink`] after every finished item.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// Consumer of progress events. Must tolerate calls from several workers.
#[cfg_attr(test, mockall::automock)]
pub trait ProgressSink: Send + Sync {
    /// Fraction of items completed, in `0.0..=1.0`
    fn report_fraction(&self, fraction: f64);

    /// Human-readable status line
    fn report_message(&self, message: &str);
}

/// Sink that forwards progress to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn report_fraction(&self, fraction: f64) {
        debug!(progress = fraction, "progress");
    }

    fn report_message(&self, message: &str) {
        info!("{}", message);
    }
}

/// Sink that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn report_fraction(&self, _fraction: f64) {}

    fn report_message(&self, _message: &str) {}
}

/// Completion counter plus publisher for one run.
///
/// The increment and both publishes happen under one lock, so a consumer
/// always sees a fraction and a message describing the same count, and counts
/// arrive in increasing order.
pub struct ProgressAggregator<'a> {
    sink: &'a dyn ProgressSink,
    completed: AtomicUsize,
    total: usize,
    publish: Mutex<()>,
}

impl<'a> ProgressAggregator<'a> {
    pub fn new(sink: &'a dyn ProgressSink, total: usize) -> Self {
        Self {
            sink,
            completed: AtomicUsize::new(0),
            total,
            publish: Mutex::new(()),
        }
    }

    /// Record one finished item and publish the new progress.
    ///
    /// Returns the completion count after the increment.
    pub fn complete_one(&self) -> usize {
        let _guard = self.publish.lock();
        let completed = self.completed.fetch_add(1, Ordering::AcqRel) + 1;
        debug_assert!(completed <= self.total, "completed more items than exist");

        let fraction = if self.total == 0 {
            1.0
        } else {
            completed as f64 / self.total as f64
        };
        self.sink.report_fraction(fraction);
        self.sink
            .report_message(&format!("Processed: {}/{}", completed, self.total));
        completed
    }

    /// Publish a free-form status message
    pub fn message(&self, message: &str) {
        let _guard = self.publish.lock();
        self.sink.report_message(message);
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    pub fn total(&self) -> usize {
        self.total
    }
}
