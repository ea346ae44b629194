//! Work-index allocation
//!
//! A single atomic counter hands out each index in `0..total` to exactly one
//! caller. Once every index is claimed the counter stops moving and every
//! further call sees [`Claim::Exhausted`].

use std::sync::atomic::{AtomicUsize, Ordering};

/// Result of asking the dispatcher for work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// Exclusive responsibility for this flat index
    Item(usize),
    /// No unclaimed index remains
    Exhausted,
}

/// Lock-free index dispenser shared by all workers of a run
#[derive(Debug)]
pub struct Dispatcher {
    built: AtomicUsize,
    total: usize,
}

impl Dispatcher {
    pub fn new(total: usize) -> Self {
        Self {
            built: AtomicUsize::new(0),
            total,
        }
    }

    /// Claim the next unclaimed index.
    ///
    /// The counter is only advanced while it is below `total`, so it never
    /// overshoots no matter how many callers keep asking.
    pub fn claim(&self) -> Claim {
        let total = self.total;
        match self
            .built
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |built| {
                (built < total).then_some(built + 1)
            }) {
            Ok(index) => Claim::Item(index),
            Err(_) => Claim::Exhausted,
        }
    }

    /// Number of indices handed out so far
    pub fn claimed(&self) -> usize {
        self.built.load(Ordering::Acquire)
    }
}
