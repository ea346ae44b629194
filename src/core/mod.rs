//! Core batch engine
//!
//! - **grid**: grids, input ranges, flatten and reshape
//! - **dispatch**: atomic work-index allocation
//! - **item**: the per-item operation capability
//! - **progress**: progress aggregation and sinks
//! - **sink**: output sinks for finished runs
//! - **engine**: worker pool and run lifecycle

pub mod dispatch;
pub mod engine;
pub mod grid;
pub mod item;
pub mod progress;
pub mod sink;

pub use dispatch::{Claim, Dispatcher};
pub use engine::{Engine, RunOutcome, RunSummary, WorkerExit, resolve_concurrency};
pub use grid::{Area, CellRef, CellValue, FlattenedSource, Grid, InputRange, reshape};
pub use item::{ItemError, ItemProcessor, ItemResult, ProcessFn, process_fn};
pub use progress::{NoopProgress, ProgressAggregator, ProgressSink, TracingProgress};
pub use sink::{Delivery, GridSink, MemorySink, render_cell};
