//! Column width estimation for table layout.
//!
//! Widths are in character units: one per code point up to U+00FF, two for
//! anything above, which approximates CJK double-width rendering.

use crate::block::{ColumnWidths, Row, Span};

/// Padding added to the widest cell of each column.
pub const COLUMN_PADDING: u32 = 2;

/// Display width of a styled run sequence.
pub fn text_width(spans: &[Span]) -> u32 {
    spans
        .iter()
        .flat_map(|span| span.text.chars())
        .map(|c| if u32::from(c) > 255 { 2 } else { 1 })
        .sum()
}

/// Compute padded, capped widths for every column of one table.
///
/// The widest cell is capped, padded, then capped again, so every width
/// lies in `1..=max_width`. Rows may have different lengths; the column
/// count is that of the longest row.
pub fn estimate(rows: &[Row], max_width: u32) -> ColumnWidths {
    let cap = max_width.max(1);
    let mut raw: Vec<u32> = Vec::new();

    for row in rows {
        for (column, cell) in row.iter().enumerate() {
            let width = text_width(cell);
            match raw.get_mut(column) {
                Some(widest) => *widest = (*widest).max(width),
                None => raw.push(width),
            }
        }
    }

    ColumnWidths::new(
        raw.into_iter()
            .map(|width| (width.min(cap) + COLUMN_PADDING).min(cap))
            .collect(),
    )
}
