//! Common test utilities for gridprobe
//!
//! - **fixtures**: input ranges and worksheets
//! - **progress**: a progress sink that records every event
//! - **assertions**: grid rendering assertions

pub mod assertions;
pub mod fixtures;
pub mod progress;

pub use fixtures::{column_range, numbered_range, sheet_with_column};
pub use progress::RecordingProgress;
