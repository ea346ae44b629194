//! Error types for gridprobe
//!
//! Only [`GridError`] crosses the engine boundary as a hard failure. Per-item
//! failures are data, see [`crate::core::item::ItemError`].

use thiserror::Error;

/// Result type alias for gridprobe
pub type Result<T> = std::result::Result<T, GridError>;

/// Main error type for gridprobe
#[derive(Error, Debug)]
pub enum GridError {
    /// The selection is made of more than one rectangular area
    #[error("Discontiguous range: selection has {areas} areas, expected exactly one")]
    DiscontiguousRange { areas: usize },

    /// The selection has no rows or no columns
    #[error("Empty range: selection must have at least one row and one column")]
    EmptyRange,

    /// An area whose rows do not all have the same width
    #[error("Ragged range: row {row} has {found} cells, expected {expected}")]
    RaggedRange {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A cell that cannot be read as a text item
    #[error("Cell at row {row}, column {column} holds {found}, expected text")]
    Coercion {
        row: usize,
        column: usize,
        found: &'static str,
    },

    /// A flat result sequence whose length does not match the grid shape
    #[error("Shape mismatch: expected {expected} results, found {found}")]
    ShapeMismatch { expected: usize, found: usize },

    /// A malformed A1-style cell or range reference
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl GridError {
    /// Whether this error belongs to the input class that aborts a run
    /// before any work is dispatched.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            GridError::DiscontiguousRange { .. }
                | GridError::EmptyRange
                | GridError::RaggedRange { .. }
                | GridError::Coercion { .. }
                | GridError::InvalidReference(_)
        )
    }
}
