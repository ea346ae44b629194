//! Tab-separated worksheet
//!
//! A minimal spreadsheet stand-in: one row per line, cells separated by tabs.
//! It resolves A1-style selections into an [`InputRange`] and, as a
//! [`GridSink`], writes results immediately to the right of the input area.

use crate::core::grid::{Area, CellRef, CellValue, Grid, InputRange};
use crate::core::item::ItemResult;
use crate::core::sink::{GridSink, render_cell};
use crate::utils::error::{GridError, Result};
use std::fmt::{self, Display};
use std::path::Path;
use tracing::{debug, info};

/// Largest selection, in cells, that [`Worksheet::area`] will copy out
pub const MAX_SELECTION_CELLS: usize = 1 << 24;

/// Inclusive rectangular reference such as `A1:C4`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRef {
    pub start: CellRef,
    pub end: CellRef,
}

impl RangeRef {
    /// Parse `A1` or `A1:C4`; corners may be given in any order
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let (first, second) = match text.split_once(':') {
            Some((a, b)) => (CellRef::parse_a1(a)?, CellRef::parse_a1(b)?),
            None => {
                let cell = CellRef::parse_a1(text)?;
                (cell, cell)
            }
        };

        Ok(Self {
            start: CellRef::new(first.row.min(second.row), first.column.min(second.column)),
            end: CellRef::new(first.row.max(second.row), first.column.max(second.column)),
        })
    }

    pub fn rows(&self) -> usize {
        self.end.row - self.start.row + 1
    }

    pub fn columns(&self) -> usize {
        self.end.column - self.start.column + 1
    }
}

impl Display for RangeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}

/// In-memory worksheet backed by a TSV file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Worksheet {
    rows: Vec<Vec<CellValue>>,
}

impl Worksheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TSV text
    pub fn parse(text: &str) -> Self {
        let rows = text
            .lines()
            .map(|line| line.split('\t').map(parse_cell).collect())
            .collect();
        Self { rows }
    }

    /// Load a worksheet from a TSV file
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading worksheet from: {:?}", path);
        let text = tokio::fs::read_to_string(path).await?;
        let sheet = Self::parse(&text);
        debug!(rows = sheet.rows.len(), "Worksheet loaded");
        Ok(sheet)
    }

    /// Write the worksheet to a TSV file
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        info!("Saving worksheet to: {:?}", path);
        tokio::fs::write(path, self.to_tsv()).await?;
        Ok(())
    }

    /// Render as TSV text, trailing empty cells trimmed per row.
    ///
    /// Tabs and line breaks inside a cell are written as spaces so every cell
    /// stays in its own field.
    pub fn to_tsv(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            let used = row
                .iter()
                .rposition(|c| *c != CellValue::Empty)
                .map_or(0, |p| p + 1);
            let line: Vec<String> = row[..used]
                .iter()
                .map(|cell| cell.to_string().replace(['\t', '\n', '\r'], " "))
                .collect();
            out.push_str(&line.join("\t"));
            out.push('\n');
        }
        out
    }

    /// Cell at `cell`, empty outside the used area
    pub fn get(&self, cell: CellRef) -> &CellValue {
        self.rows
            .get(cell.row)
            .and_then(|row| row.get(cell.column))
            .unwrap_or(&CellValue::Empty)
    }

    /// Set one cell, growing the sheet as needed
    pub fn set(&mut self, cell: CellRef, value: CellValue) {
        if self.rows.len() <= cell.row {
            self.rows.resize_with(cell.row + 1, Vec::new);
        }
        let row = &mut self.rows[cell.row];
        if row.len() <= cell.column {
            row.resize(cell.column + 1, CellValue::Empty);
        }
        row[cell.column] = value;
    }

    /// Copy one rectangular area out of the sheet
    pub fn area(&self, range: RangeRef) -> Result<Area> {
        let cells = range.rows().saturating_mul(range.columns());
        if cells > MAX_SELECTION_CELLS {
            return Err(GridError::InvalidReference(format!(
                "{} spans {} cells, at most {} can be selected",
                range, cells, MAX_SELECTION_CELLS
            )));
        }

        let rows = (0..range.rows())
            .map(|i| {
                (0..range.columns())
                    .map(|j| self.get(range.start.offset(i, j)).clone())
                    .collect()
            })
            .collect();
        Area::from_rows(range.start, rows)
    }

    /// Resolve a selection such as `A1:A10` or `A1:A3,C1:C3`.
    ///
    /// Each comma-separated reference becomes one area of the returned range.
    pub fn select(&self, selection: &str) -> Result<InputRange> {
        let areas = selection
            .split(',')
            .map(|part| RangeRef::parse(part).and_then(|range| self.area(range)))
            .collect::<Result<Vec<_>>>()?;
        Ok(InputRange::new(areas))
    }
}

/// Interpret one raw TSV field
pub fn parse_cell(raw: &str) -> CellValue {
    let field = raw.trim_end_matches('\r');
    if field.is_empty() {
        return CellValue::Empty;
    }
    if field.eq_ignore_ascii_case("true") {
        return CellValue::Bool(true);
    }
    if field.eq_ignore_ascii_case("false") {
        return CellValue::Bool(false);
    }
    match field.parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::Text(field.to_string()),
    }
}

impl<V: Display + Send> GridSink<V> for Worksheet {
    fn deliver(&mut self, source_origin: CellRef, results: &Grid<ItemResult<V>>) -> Result<()> {
        let target = source_origin.offset(0, results.columns());
        for (i, row) in results.iter_rows().enumerate() {
            for (j, result) in row.iter().enumerate() {
                let cell = target.offset(i, j);
                if let CellValue::Text(existing) = self.get(cell) {
                    debug!(%cell, "Overwriting '{}'", existing);
                }
                self.set(cell, CellValue::Text(render_cell(result)));
            }
        }
        debug!(%target, rows = results.rows(), "Results written");
        Ok(())
    }
}
