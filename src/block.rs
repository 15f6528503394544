use crate::error::Diagnostic;

/// A run of text with uniform styling.
///
/// A zero-width span with `breaks_after` set marks an explicit line break.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
    pub breaks_after: bool,
}

impl Span {
    /// Unstyled text.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            ..Self::default()
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            italic: true,
            ..Self::default()
        }
    }

    pub fn code(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            code: true,
            ..Self::default()
        }
    }

    /// Zero-width explicit line break.
    pub fn line_break() -> Self {
        Self {
            breaks_after: true,
            ..Self::default()
        }
    }

    /// True for the zero-width break marker.
    pub fn is_line_break(&self) -> bool {
        self.text.is_empty() && self.breaks_after
    }
}

/// Ordered sequence of spans.
pub type RichText = Vec<Span>;

/// A table cell.
pub type Cell = RichText;

/// A table row. Rows of one table may differ in length.
pub type Row = Vec<Cell>;

/// Concatenate span texts, ignoring styling and breaks.
pub fn plain_text(spans: &[Span]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

/// List item marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    Bullet,
    Ordered(u32),
}

/// Display widths per 0-based column index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnWidths(Vec<u32>);

impl ColumnWidths {
    pub fn new(widths: Vec<u32>) -> Self {
        Self(widths)
    }

    pub fn get(&self, column: usize) -> Option<u32> {
        self.0.get(column).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

/// Block-level elements parsed from Markdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: u8,
        content: RichText,
    },
    Paragraph {
        content: RichText,
    },
    CodeBlock {
        /// Info string after the opening fence, if any.
        language: Option<String>,
        lines: Vec<String>,
    },
    Table {
        rows: Vec<Row>,
        widths: ColumnWidths,
        /// The first row was followed by a separator row.
        header: bool,
    },
    ListItem {
        marker: ListMarker,
        content: RichText,
    },
    Blank,
}

/// The result of one conversion: blocks in source order plus the non-fatal
/// diagnostics raised while building them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
    diagnostics: Vec<Diagnostic>,
}

impl Document {
    pub(crate) fn new(blocks: Vec<Block>, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            blocks,
            diagnostics,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    /// Iterate over the table blocks as `(rows, widths)` pairs.
    pub fn tables(&self) -> impl Iterator<Item = (&[Row], &ColumnWidths)> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Table { rows, widths, .. } => Some((rows.as_slice(), widths)),
            _ => None,
        })
    }
}
