//! Output sinks for finished runs
//!
//! A sink receives the reshaped result grid together with the origin of the
//! input area. Where the results land is the sink's decision; the worksheet
//! sink writes them immediately to the right of the input.

use super::grid::{CellRef, Grid};
use super::item::ItemResult;
use crate::utils::error::Result;
use std::fmt::Display;

/// Receiver of a completed run's results
pub trait GridSink<V>: Send {
    fn deliver(&mut self, source_origin: CellRef, results: &Grid<ItemResult<V>>) -> Result<()>;
}

/// Render one result slot as cell text: the value, or the error message
pub fn render_cell<V: Display>(result: &ItemResult<V>) -> String {
    match result {
        Ok(value) => value.to_string(),
        Err(err) => err.to_string(),
    }
}

/// One recorded delivery
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery<V> {
    pub source_origin: CellRef,
    pub target_origin: CellRef,
    pub results: Grid<ItemResult<V>>,
}

/// Sink that keeps deliveries in memory
#[derive(Debug, Clone)]
pub struct MemorySink<V> {
    deliveries: Vec<Delivery<V>>,
}

impl<V> Default for MemorySink<V> {
    fn default() -> Self {
        Self {
            deliveries: Vec::new(),
        }
    }
}

impl<V> MemorySink<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliveries(&self) -> &[Delivery<V>] {
        &self.deliveries
    }

    pub fn last(&self) -> Option<&Delivery<V>> {
        self.deliveries.last()
    }

    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }
}

impl<V: Clone + Send> GridSink<V> for MemorySink<V> {
    fn deliver(&mut self, source_origin: CellRef, results: &Grid<ItemResult<V>>) -> Result<()> {
        self.deliveries.push(Delivery {
            source_origin,
            target_origin: source_origin.offset(0, results.columns()),
            results: results.clone(),
        });
        Ok(())
    }
}
