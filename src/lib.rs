//! # gridprobe
//!
//! Bounded-concurrency batch processing over rectangular cell ranges.
//!
//! A contiguous range of cells is flattened into a work list, each item is run
//! through an asynchronous per-item operation by a pool of workers, and the
//! results are reshaped to the input's geometry and written next to it.
//! Progress is reported once per finished item and a run can be cancelled
//! cooperatively at any time.
//!
//! ## Features
//!
//! - **Bounded pool**: one worker per processor by default, never more workers than items
//! - **Ordered results**: result `(i, j)` always belongs to input `(i, j)`
//! - **Per-item errors**: a failed item is recorded in its cell and the run continues
//! - **Cancellation**: a cancelled run delivers nothing to the sink
//! - **Probes**: HTTP reachability and media duration out of the box
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gridprobe::{Engine, NoopProgress, Worksheet, process_fn};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut sheet = Worksheet::load("links.tsv").await?;
//!     let range = sheet.select("A2:A20")?;
//!
//!     let engine = Engine::new(&range, 0)?;
//!     let lengths = process_fn(|item: String, _cancel| async move { Ok(item.len()) });
//!     engine
//!         .start(&lengths, &NoopProgress, &mut sheet, &CancellationToken::new())
//!         .await?;
//!
//!     sheet.save("links.tsv").await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod probes;
pub mod sheet;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{GridError, Result};

pub use core::{
    Area, CellRef, CellValue, Engine, GridSink, Grid, InputRange, ItemError, ItemProcessor,
    ItemResult, MemorySink, NoopProgress, ProgressSink, RunOutcome, RunSummary, TracingProgress,
    process_fn,
};
pub use probes::{DurationProbe, ReachabilityProbe};
pub use sheet::{RangeRef, Worksheet};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Text of `gridprobe --version`: version, commit, toolchain and build time
/// in seconds since the epoch
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", ",
    env!("RUST_VERSION"),
    ", built ",
    env!("BUILD_TIME"),
    ")"
);

/// Build metadata recorded by the build script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    /// Seconds since the epoch
    pub build_time: &'static str,
    pub git_hash: &'static str,
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}, {}, built {})",
            self.version, self.git_hash, self.rust_version, self.build_time
        )
    }
}

pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
