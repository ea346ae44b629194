//! Custom test assertions

use gridprobe::core::render_cell;
use gridprobe::{Grid, ItemResult};
use std::fmt::Display;

/// Render a result grid the way it is written into a worksheet
pub fn rendered<V: Display>(results: &Grid<ItemResult<V>>) -> Vec<Vec<String>> {
    results
        .iter_rows()
        .map(|row| row.iter().map(render_cell).collect())
        .collect()
}

/// Assert a result grid renders to the given rows
#[macro_export]
macro_rules! assert_rendered {
    ($results:expr, [$([$($cell:expr),* $(,)?]),* $(,)?]) => {
        let expected: Vec<Vec<String>> = vec![$(vec![$($cell.to_string()),*]),*];
        assert_eq!($crate::common::assertions::rendered($results), expected);
    };
}
