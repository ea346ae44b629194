//! Test fixtures

use gridprobe::{CellRef, InputRange, Worksheet};

/// Single-column range anchored at A1
pub fn column_range<S: AsRef<str>>(items: &[S]) -> InputRange {
    let rows: Vec<Vec<&str>> = items.iter().map(|s| vec![s.as_ref()]).collect();
    InputRange::from_text_rows(CellRef::new(0, 0), &rows).unwrap()
}

/// Single-column range of `"0"`, `"1"`, ... anchored at A1
pub fn numbered_range(count: usize) -> InputRange {
    let items: Vec<String> = (0..count).map(|i| i.to_string()).collect();
    column_range(&items)
}

/// Worksheet with a header in A1 and `items` below it
pub fn sheet_with_column<S: AsRef<str>>(header: &str, items: &[S]) -> Worksheet {
    let mut text = format!("{}\n", header);
    for item in items {
        text.push_str(item.as_ref());
        text.push('\n');
    }
    Worksheet::parse(&text)
}
