//! Concurrent dispatch engine
//!
//! An [`Engine`] is built once per run from a contiguous input range. Starting
//! it launches a bounded pool of workers; each worker repeatedly claims the
//! next flat index from the [`Dispatcher`], runs the per-item operation,
//! stores the result in that index's slot and reports progress, until the
//! dispatcher is exhausted or cancellation is observed.
//!
//! Workers are futures joined on the calling task, so all run state is shared
//! by plain reference and the join is the single barrier of a run.

use super::dispatch::{Claim, Dispatcher};
use super::grid::{CellRef, FlattenedSource, Grid, InputRange, reshape};
use super::item::{ItemProcessor, ItemResult};
use super::progress::{ProgressAggregator, ProgressSink};
use super::sink::GridSink;
use crate::config::EngineConfig;
use crate::utils::error::{GridError, Result};
use crate::utils::truncate_string;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span};

/// Resolve the worker count for a run.
///
/// `requested == 0` means one worker per processor. The result is always in
/// `1..=max(total, 1)`.
pub fn resolve_concurrency(requested: usize, total: usize, processors: usize) -> usize {
    let wanted = if requested > 0 { requested } else { processors };
    wanted.clamp(1, total.max(1))
}

/// Why a worker stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// The dispatcher had no more work
    Exhausted,
    /// Cancellation was observed before starting another item
    Cancelled,
}

/// Statistics for one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Number of items in the input
    pub total: usize,
    /// Items whose result slot was filled
    pub completed: usize,
    /// Filled slots holding a success value
    pub succeeded: usize,
    /// Filled slots holding an error
    pub failed: usize,
    /// Workers launched
    pub workers: usize,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Wall time of the run
    pub elapsed: Duration,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome<V> {
    /// Every item finished and the sink received the grid
    Completed {
        results: Grid<ItemResult<V>>,
        summary: RunSummary,
    },
    /// Cancellation was requested; the sink was not touched
    Cancelled {
        partial: Vec<Option<ItemResult<V>>>,
        summary: RunSummary,
    },
}

impl<V> RunOutcome<V> {
    pub fn summary(&self) -> &RunSummary {
        match self {
            RunOutcome::Completed { summary, .. } | RunOutcome::Cancelled { summary, .. } => {
                summary
            }
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunOutcome::Cancelled { .. })
    }

    /// The result grid of a completed run
    pub fn results(&self) -> Option<&Grid<ItemResult<V>>> {
        match self {
            RunOutcome::Completed { results, .. } => Some(results),
            RunOutcome::Cancelled { .. } => None,
        }
    }
}

/// Batch engine over one contiguous input range
#[derive(Debug, Clone)]
pub struct Engine {
    source: FlattenedSource,
    origin: CellRef,
    concurrency: usize,
}

impl Engine {
    /// Build an engine, sizing the pool from the processor count when
    /// `requested_concurrency` is 0.
    ///
    /// Fails with an input error if the range is not a single area or a cell
    /// cannot be read as text.
    pub fn new(range: &InputRange, requested_concurrency: usize) -> Result<Self> {
        Self::with_processors(range, requested_concurrency, num_cpus::get())
    }

    /// Build an engine from the engine section of the configuration
    pub fn from_config(range: &InputRange, config: &EngineConfig) -> Result<Self> {
        Self::new(range, config.concurrency)
    }

    /// Build an engine assuming `processors` available processors
    pub fn with_processors(
        range: &InputRange,
        requested_concurrency: usize,
        processors: usize,
    ) -> Result<Self> {
        let origin = range.contiguous_area()?.origin();
        let source = FlattenedSource::from_range(range)?;
        let concurrency = resolve_concurrency(requested_concurrency, source.len(), processors);

        debug!(
            total = source.len(),
            requested = requested_concurrency,
            concurrency,
            "Engine constructed"
        );

        Ok(Self {
            source,
            origin,
            concurrency,
        })
    }

    pub fn total(&self) -> usize {
        self.source.len()
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn source(&self) -> &FlattenedSource {
        &self.source
    }

    pub fn origin(&self) -> CellRef {
        self.origin
    }

    /// Run every item through `processor`.
    ///
    /// On completion without cancellation the reshaped grid is handed to
    /// `sink`. If `cancel` fires at any point the sink is left untouched and
    /// the partially filled slots are returned instead.
    pub async fn start<P, S>(
        &self,
        processor: &P,
        progress: &dyn ProgressSink,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> Result<RunOutcome<P::Output>>
    where
        P: ItemProcessor + ?Sized,
        S: GridSink<P::Output> + ?Sized,
    {
        let started_at = Utc::now();
        let stopwatch = Instant::now();
        let total = self.total();

        let state = RunState {
            source: &self.source,
            dispatcher: Dispatcher::new(total),
            slots: (0..total).map(|_| OnceLock::new()).collect(),
            progress: ProgressAggregator::new(progress, total),
            processor,
            cancel,
        };
        state.progress.message("Initializing task resources...");

        let workers = if cancel.is_cancelled() {
            info!("Cancelled before launch, no workers started");
            0
        } else {
            self.concurrency
        };
        info!(total, workers, "Run started");

        let span = info_span!("run", total, workers);
        let exits = join_all((0..workers).map(|id| state.work_continuously(id)))
            .instrument(span)
            .await;
        debug!(
            exhausted = exits.iter().filter(|e| **e == WorkerExit::Exhausted).count(),
            cancelled = exits.iter().filter(|e| **e == WorkerExit::Cancelled).count(),
            "All workers joined"
        );

        let completed = state.progress.completed();
        let slots: Vec<Option<ItemResult<P::Output>>> =
            state.slots.into_iter().map(OnceLock::into_inner).collect();
        let succeeded = slots.iter().filter(|s| matches!(s, Some(Ok(_)))).count();
        let elapsed = stopwatch.elapsed();

        let summary = RunSummary {
            total,
            completed,
            succeeded,
            failed: slots.iter().filter(|s| matches!(s, Some(Err(_)))).count(),
            workers,
            started_at,
            elapsed,
        };
        state.progress.message(&format!(
            "Elapsed {:.2}s, {}/{}",
            elapsed.as_secs_f64(),
            completed,
            total
        ));

        if cancel.is_cancelled() {
            info!(completed, total, "Run cancelled, results not delivered");
            return Ok(RunOutcome::Cancelled {
                partial: slots,
                summary,
            });
        }

        let filled = slots.iter().filter(|s| s.is_some()).count();
        let flat = slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or(GridError::ShapeMismatch {
                expected: total,
                found: filled,
            })?;
        let results = reshape(flat, self.source.rows(), self.source.columns())?;

        sink.deliver(self.origin, &results)?;
        info!(
            total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            elapsed_ms = elapsed.as_millis() as u64,
            "Run completed"
        );

        Ok(RunOutcome::Completed { results, summary })
    }
}

/// State shared by every worker of one run
struct RunState<'a, P: ItemProcessor + ?Sized> {
    source: &'a FlattenedSource,
    dispatcher: Dispatcher,
    slots: Vec<OnceLock<ItemResult<P::Output>>>,
    progress: ProgressAggregator<'a>,
    processor: &'a P,
    cancel: &'a CancellationToken,
}

impl<P: ItemProcessor + ?Sized> RunState<'_, P> {
    /// Worker loop: claim, check cancellation, process, record, report.
    async fn work_continuously(&self, worker: usize) -> WorkerExit {
        let mut processed = 0usize;
        let exit = loop {
            let index = match self.dispatcher.claim() {
                Claim::Item(index) => index,
                Claim::Exhausted => break WorkerExit::Exhausted,
            };
            if self.cancel.is_cancelled() {
                break WorkerExit::Cancelled;
            }

            let item = &self.source.items()[index];
            let result = self.processor.process(item, self.cancel).await;
            if let Err(e) = &result {
                debug!(
                    index,
                    item = %truncate_string(item, 80),
                    error = %e,
                    "Item failed"
                );
            }

            let stored = self.slots[index].set(result).is_ok();
            debug_assert!(stored, "result slot {} written twice", index);

            self.progress.complete_one();
            processed += 1;
        };

        debug!(worker, processed, exit = ?exit, "Worker finished");
        exit
    }
}
