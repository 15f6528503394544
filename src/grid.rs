//! Grid layout for spreadsheet-like sinks.
//!
//! Every non-table block becomes one full-width row spanning all used
//! columns. Each table row becomes one row with a cell per column. Sheet
//! column widths are the widest estimate at each index over all tables.

use crate::block::{Block, Cell, Document, ListMarker, Span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridRow<'a> {
    Heading {
        level: u8,
        content: &'a [Span],
    },
    Text {
        content: &'a [Span],
    },
    ListItem {
        marker: ListMarker,
        content: &'a [Span],
    },
    Code {
        language: Option<&'a str>,
        lines: &'a [String],
    },
    Blank,
    /// One table row. May be shorter or longer than its neighbours.
    Cells { cells: &'a [Cell], header: bool },
}

impl GridRow<'_> {
    /// Whether the row is a single merged cell spanning all columns.
    pub fn is_full_width(&self) -> bool {
        !matches!(self, GridRow::Cells { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<'a> {
    columns: Vec<u32>,
    rows: Vec<GridRow<'a>>,
}

impl<'a> Grid<'a> {
    pub fn from_document(document: &'a Document) -> Self {
        let mut columns: Vec<u32> = Vec::new();
        for (_, widths) in document.tables() {
            for (index, &width) in widths.as_slice().iter().enumerate() {
                match columns.get_mut(index) {
                    Some(widest) => *widest = (*widest).max(width),
                    None => columns.push(width),
                }
            }
        }

        let mut rows = Vec::new();
        for block in document.blocks() {
            match block {
                Block::Heading { level, content } => rows.push(GridRow::Heading {
                    level: *level,
                    content,
                }),
                Block::Paragraph { content } => rows.push(GridRow::Text { content }),
                Block::ListItem { marker, content } => rows.push(GridRow::ListItem {
                    marker: *marker,
                    content,
                }),
                Block::CodeBlock { language, lines } => rows.push(GridRow::Code {
                    language: language.as_deref(),
                    lines,
                }),
                Block::Blank => rows.push(GridRow::Blank),
                Block::Table {
                    rows: table,
                    header,
                    ..
                } => {
                    rows.extend(table.iter().enumerate().map(|(index, cells)| {
                        GridRow::Cells {
                            cells,
                            header: *header && index == 0,
                        }
                    }));
                }
            }
        }

        Self { columns, rows }
    }

    /// Sheet column widths, one per used column.
    pub fn columns(&self) -> &[u32] {
        &self.columns
    }

    /// Number of columns a full-width row spans; at least one.
    pub fn span(&self) -> usize {
        self.columns.len().max(1)
    }

    pub fn rows(&self) -> &[GridRow<'a>] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    #[test]
    fn rows_follow_block_order() {
        let doc = parse(
            "# T\n| a | b |\n|---|---|\n| 1 | 2 |\n\n- x\n```\ncode\n```",
            &Config::default(),
        );
        let grid = Grid::from_document(&doc);
        let kinds: Vec<&str> = grid
            .rows()
            .iter()
            .map(|row| match row {
                GridRow::Heading { .. } => "heading",
                GridRow::Text { .. } => "text",
                GridRow::ListItem { .. } => "list",
                GridRow::Code { .. } => "code",
                GridRow::Blank => "blank",
                GridRow::Cells { .. } => "cells",
            })
            .collect();
        assert_eq!(
            kinds,
            vec!["heading", "cells", "cells", "blank", "list", "code"]
        );
        assert_eq!(grid.span(), 2);
        assert!(grid.rows()[0].is_full_width());
        assert!(!grid.rows()[1].is_full_width());
    }

    #[test]
    fn only_first_row_of_headed_table_is_header() {
        let doc = parse("| a |\n|---|\n| 1 |\n| 2 |", &Config::default());
        let grid = Grid::from_document(&doc);
        let headers: Vec<bool> = grid
            .rows()
            .iter()
            .filter_map(|row| match row {
                GridRow::Cells { header, .. } => Some(*header),
                _ => None,
            })
            .collect();
        assert_eq!(headers, vec![true, false, false]);
    }

    #[test]
    fn sheet_columns_take_widest_table() {
        let doc = parse(
            "| aaaaaa | b |\n\n| c | dddddddd | e |",
            &Config::default(),
        );
        let grid = Grid::from_document(&doc);
        assert_eq!(grid.columns(), &[8, 10, 3]);
    }

    #[test]
    fn no_tables_spans_one_column() {
        let doc = parse("just text", &Config::default());
        let grid = Grid::from_document(&doc);
        assert!(grid.columns().is_empty());
        assert_eq!(grid.span(), 1);
    }

    #[test]
    fn empty_document_has_no_rows() {
        let doc = parse("", &Config::default());
        assert!(Grid::from_document(&doc).rows().is_empty());
    }
}
