//! Concrete per-item probes
//!
//! Each probe is one implementation of [`crate::core::ItemProcessor`].

pub mod duration;
pub mod reachability;

pub use duration::{DurationProbe, parse_duration};
pub use reachability::ReachabilityProbe;
