//! Rectangular grids, input ranges and row-major linearisation
//!
//! A run reads one rectangular [`Area`] of cells, flattens it row-major into a
//! [`FlattenedSource`] (`t = i * columns + j`), and reshapes the flat result
//! sequence back into a [`Grid`] of the same shape with [`reshape`].

use crate::utils::error::{GridError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A rectangular, row-major grid of values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    rows: usize,
    columns: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Build a grid from row vectors, rejecting empty or ragged input
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let columns = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || columns == 0 {
            return Err(GridError::EmptyRange);
        }

        let row_count = rows.len();
        let mut cells = Vec::with_capacity(row_count * columns);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != columns {
                return Err(GridError::RaggedRange {
                    row: index,
                    expected: columns,
                    found: row.len(),
                });
            }
            cells.extend(row);
        }

        Ok(Self {
            rows: row_count,
            columns,
            cells,
        })
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid holds no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at `(row, column)`
    pub fn get(&self, row: usize, column: usize) -> Option<&T> {
        if row < self.rows && column < self.columns {
            self.cells.get(row * self.columns + column)
        } else {
            None
        }
    }

    /// Iterate over rows as slices
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.columns)
    }

    /// Consume the grid into its row-major cell sequence
    pub fn into_cells(self) -> Vec<T> {
        self.cells
    }
}

/// Reshape a flat row-major sequence into a `rows × columns` grid.
///
/// `grid[i][j] = flat[i * columns + j]`; the length must be exactly
/// `rows * columns`.
pub fn reshape<T>(flat: Vec<T>, rows: usize, columns: usize) -> Result<Grid<T>> {
    let expected = rows * columns;
    if flat.len() != expected {
        return Err(GridError::ShapeMismatch {
            expected,
            found: flat.len(),
        });
    }
    if expected == 0 {
        return Err(GridError::EmptyRange);
    }
    Ok(Grid {
        rows,
        columns,
        cells: flat,
    })
}

/// Raw contents of one worksheet cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Short description of the value's kind, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            CellValue::Empty => "an empty cell",
            CellValue::Text(_) => "text",
            CellValue::Number(_) => "a number",
            CellValue::Bool(_) => "a boolean",
        }
    }

    /// Read the cell as a text item. Empty cells read as the empty string.
    pub fn as_item(&self) -> Option<&str> {
        match self {
            CellValue::Empty => Some(""),
            CellValue::Text(text) => Some(text),
            CellValue::Number(_) | CellValue::Bool(_) => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(text) => f.write_str(text),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(true) => f.write_str("TRUE"),
            CellValue::Bool(false) => f.write_str("FALSE"),
        }
    }
}

/// Rows in a worksheet, `1..=MAX_ROWS` in A1 notation
pub const MAX_ROWS: usize = 1_048_576;

/// Columns in a worksheet, `A..=XFD` in A1 notation
pub const MAX_COLUMNS: usize = 16_384;

/// Zero-based cell coordinate, written in A1 notation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub column: usize,
}

impl CellRef {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// The cell `rows` down and `columns` right of this one
    pub fn offset(self, rows: usize, columns: usize) -> Self {
        Self {
            row: self.row + rows,
            column: self.column + columns,
        }
    }

    /// Parse an A1-style reference such as `B7` or `$AA$10`.
    ///
    /// References past `XFD1048576` are rejected.
    pub fn parse_a1(text: &str) -> Result<Self> {
        let invalid = || GridError::InvalidReference(text.to_string());
        let cleaned: String = text.trim().chars().filter(|c| *c != '$').collect();

        let split = cleaned
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (letters, digits) = cleaned.split_at(split);
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }

        let mut column: usize = 0;
        for c in letters.chars() {
            let value = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
            column = column
                .checked_mul(26)
                .and_then(|n| n.checked_add(value))
                .ok_or_else(invalid)?;
        }

        let row: usize = digits.parse().map_err(|_| invalid())?;
        if row == 0 || row > MAX_ROWS || column > MAX_COLUMNS {
            return Err(invalid());
        }

        Ok(Self {
            row: row - 1,
            column: column - 1,
        })
    }

    /// Column letters for a zero-based column index
    pub fn column_name(column: usize) -> String {
        let mut n = column + 1;
        let mut letters = Vec::new();
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push((b'A' + rem as u8) as char);
            n = (n - 1) / 26;
        }
        letters.iter().rev().collect()
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::column_name(self.column), self.row + 1)
    }
}

/// One rectangular block of cells anchored at its top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    origin: CellRef,
    cells: Grid<CellValue>,
}

impl Area {
    pub fn new(origin: CellRef, cells: Grid<CellValue>) -> Self {
        Self { origin, cells }
    }

    /// Build an area from rows of raw cells
    pub fn from_rows(origin: CellRef, rows: Vec<Vec<CellValue>>) -> Result<Self> {
        Ok(Self::new(origin, Grid::from_rows(rows)?))
    }

    pub fn origin(&self) -> CellRef {
        self.origin
    }

    pub fn cells(&self) -> &Grid<CellValue> {
        &self.cells
    }

    pub fn rows(&self) -> usize {
        self.cells.rows()
    }

    pub fn columns(&self) -> usize {
        self.cells.columns()
    }
}

/// A selection of one or more areas, as handed over by a worksheet
#[derive(Debug, Clone, PartialEq)]
pub struct InputRange {
    areas: Vec<Area>,
}

impl InputRange {
    pub fn new(areas: Vec<Area>) -> Self {
        Self { areas }
    }

    /// A selection made of exactly one area
    pub fn single(area: Area) -> Self {
        Self { areas: vec![area] }
    }

    /// Convenience constructor for a single area of text cells
    pub fn from_text_rows<S: AsRef<str>>(origin: CellRef, rows: &[Vec<S>]) -> Result<Self> {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|s| CellValue::from(s.as_ref())).collect())
            .collect();
        Ok(Self::single(Area::from_rows(origin, rows)?))
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    /// The single contiguous area, or an input error
    pub fn contiguous_area(&self) -> Result<&Area> {
        match self.areas.as_slice() {
            [] => Err(GridError::EmptyRange),
            [area] => Ok(area),
            areas => Err(GridError::DiscontiguousRange { areas: areas.len() }),
        }
    }
}

/// Read-only row-major view of the input items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedSource {
    rows: usize,
    columns: usize,
    items: Vec<String>,
}

impl FlattenedSource {
    /// Linearise a contiguous range, coercing every cell to a text item
    pub fn from_range(range: &InputRange) -> Result<Self> {
        let area = range.contiguous_area()?;

        let mut items = Vec::with_capacity(area.cells().len());
        for (row, cells) in area.cells().iter_rows().enumerate() {
            for (column, cell) in cells.iter().enumerate() {
                let item = cell.as_item().ok_or(GridError::Coercion {
                    row,
                    column,
                    found: cell.kind(),
                })?;
                items.push(item.to_string());
            }
        }

        Ok(Self {
            rows: area.rows(),
            columns: area.columns(),
            items,
        })
    }

    /// Linearise a grid of items that are already text
    pub fn from_grid(grid: Grid<String>) -> Self {
        Self {
            rows: grid.rows(),
            columns: grid.columns(),
            items: grid.into_cells(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at flat index `t`
    pub fn get(&self, t: usize) -> Option<&str> {
        self.items.get(t).map(String::as_str)
    }

    /// Grid coordinate of flat index `t`
    pub fn position(&self, t: usize) -> (usize, usize) {
        (t / self.columns, t % self.columns)
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }
}
