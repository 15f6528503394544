use crate::block::{Block, Cell, Document, RichText, Row};
use crate::config::Config;
use crate::error::Diagnostic;
use crate::inline;
use crate::line::{self, Line};
use crate::width;

/// Strip YAML frontmatter from the beginning of markdown content.
///
/// Returns the remaining text and the number of lines removed.
fn strip_frontmatter(markdown: &str) -> (&str, usize) {
    if !markdown.starts_with("---") {
        return (markdown, 0);
    }
    // Find the closing ---
    let Some(end) = markdown[3..].find("\n---") else {
        return (markdown, 0);
    };
    // Skip past the rest of the closing line
    let closing = &markdown[3 + end + 4..];
    let rest = match closing.find('\n') {
        Some(newline) => &closing[newline + 1..],
        None => "",
    };
    let removed = markdown[..markdown.len() - rest.len()].matches('\n').count();
    (rest, removed)
}

/// Parse markdown text into a document
pub fn parse(markdown: &str, config: &Config) -> Document {
    let (markdown, skipped) = if config.input.strip_front_matter {
        strip_frontmatter(markdown)
    } else {
        (markdown, 0)
    };

    if markdown.lines().all(|line| line.trim().is_empty()) {
        tracing::debug!("empty markdown input");
        return Document::new(Vec::new(), vec![Diagnostic::EmptyInput]);
    }

    let mut state = ParseState::new(config.table.max_column_width);
    for (index, raw) in markdown.lines().enumerate() {
        state.process_line(raw, skipped + index + 1);
    }
    let document = state.finish();

    tracing::debug!(
        blocks = document.blocks().len(),
        diagnostics = document.diagnostics().len(),
        "parsed markdown"
    );
    document
}

enum Mode {
    Scanning,
    InCodeBlock {
        language: Option<String>,
        lines: Vec<String>,
        opened_at: usize,
    },
    InTable {
        rows: Vec<Row>,
        header: bool,
    },
}

struct ParseState {
    mode: Mode,
    blocks: Vec<Block>,
    diagnostics: Vec<Diagnostic>,
    max_column_width: u32,
}

impl ParseState {
    fn new(max_column_width: u32) -> Self {
        Self {
            mode: Mode::Scanning,
            blocks: Vec::new(),
            diagnostics: Vec::new(),
            max_column_width,
        }
    }

    fn process_line(&mut self, raw: &str, line_no: usize) {
        let line = line::classify(raw);

        match &mut self.mode {
            Mode::InCodeBlock { lines, .. } => {
                if line.is_closing_fence() {
                    self.close_code_block();
                } else {
                    lines.push(raw.to_string());
                }
                return;
            }
            Mode::InTable { .. } => match line {
                Line::TableRow(text) => {
                    self.push_row(text, line_no);
                    return;
                }
                Line::SeparatorRow => {
                    self.mark_header();
                    return;
                }
                // Not a table line: close the table and scan it normally
                _ => self.close_table(),
            },
            Mode::Scanning => {}
        }

        self.scan(line, line_no);
    }

    fn scan(&mut self, line: Line<'_>, line_no: usize) {
        match line {
            Line::Fence { info } => {
                self.mode = Mode::InCodeBlock {
                    language: info.map(str::to_string),
                    lines: Vec::new(),
                    opened_at: line_no,
                };
            }
            Line::TableRow(text) => {
                self.mode = Mode::InTable {
                    rows: Vec::new(),
                    header: false,
                };
                self.push_row(text, line_no);
            }
            Line::SeparatorRow => {}
            Line::Heading { level, text } => {
                let content = self.inline(text, line_no);
                self.blocks.push(Block::Heading { level, content });
            }
            Line::ListItem { marker, text } => {
                let content = self.inline(text, line_no);
                self.blocks.push(Block::ListItem { marker, content });
            }
            Line::Blank => self.blocks.push(Block::Blank),
            Line::PlainText(text) => {
                let content = self.inline(text, line_no);
                self.blocks.push(Block::Paragraph { content });
            }
        }
    }

    fn push_row(&mut self, text: &str, line_no: usize) {
        let row: Row = text
            .split('|')
            .map(|cell| self.inline(cell.trim(), line_no))
            .collect::<Vec<Cell>>();

        let expected = match &self.mode {
            Mode::InTable { rows, .. } => rows.first().map(Vec::len),
            _ => None,
        };
        if let Some(expected) = expected.filter(|&expected| expected != row.len()) {
            self.diagnose(Diagnostic::MalformedTableRow {
                line: line_no,
                expected,
                found: row.len(),
            });
        }

        if let Mode::InTable { rows, .. } = &mut self.mode {
            rows.push(row);
        }
    }

    /// A separator directly under the first row makes that row a header.
    fn mark_header(&mut self) {
        if let Mode::InTable { rows, header } = &mut self.mode
            && rows.len() == 1
        {
            *header = true;
        }
    }

    fn inline(&mut self, text: &str, line_no: usize) -> RichText {
        let scan = inline::scan(text);
        if let Some(marker) = scan.unterminated {
            self.diagnose(Diagnostic::UnterminatedEmphasisMarker {
                line: line_no,
                marker,
            });
        }
        scan.spans
    }

    fn diagnose(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(%diagnostic, "markdown diagnostic");
        self.diagnostics.push(diagnostic);
    }

    fn close_code_block(&mut self) {
        if let Mode::InCodeBlock {
            language, lines, ..
        } = std::mem::replace(&mut self.mode, Mode::Scanning)
        {
            self.blocks.push(Block::CodeBlock { language, lines });
        }
    }

    fn close_table(&mut self) {
        if let Mode::InTable { rows, header } = std::mem::replace(&mut self.mode, Mode::Scanning)
        {
            let widths = width::estimate(&rows, self.max_column_width);
            self.blocks.push(Block::Table {
                rows,
                widths,
                header,
            });
        }
    }

    fn finish(mut self) -> Document {
        match self.mode {
            Mode::InCodeBlock { opened_at, .. } => {
                self.diagnose(Diagnostic::UnterminatedCodeFence { line: opened_at });
                self.close_code_block();
            }
            Mode::InTable { .. } => self.close_table(),
            Mode::Scanning => {}
        }
        Document::new(self.blocks, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{ColumnWidths, ListMarker, Span};
    use pretty_assertions::assert_eq;

    fn blocks(markdown: &str) -> Vec<Block> {
        parse(markdown, &Config::default()).into_blocks()
    }

    fn cells(texts: &[&str]) -> Row {
        texts
            .iter()
            .map(|t| if t.is_empty() { vec![] } else { vec![Span::plain(*t)] })
            .collect()
    }

    #[test]
    fn heading_blank_paragraph() {
        assert_eq!(
            blocks("# Title\n\nHello **world**"),
            vec![
                Block::Heading {
                    level: 1,
                    content: vec![Span::plain("Title")],
                },
                Block::Blank,
                Block::Paragraph {
                    content: vec![Span::plain("Hello "), Span::bold("world")],
                },
            ]
        );
    }

    #[test]
    fn table_drops_separator() {
        assert_eq!(
            blocks("| a | b |\n|---|---|\n| 1 | 2 |"),
            vec![Block::Table {
                rows: vec![cells(&["a", "b"]), cells(&["1", "2"])],
                widths: ColumnWidths::new(vec![3, 3]),
                header: true,
            }]
        );
    }

    #[test]
    fn separator_only_marks_header_under_first_row() {
        let header_flags = |md: &str| -> Vec<bool> {
            blocks(md)
                .into_iter()
                .filter_map(|b| match b {
                    Block::Table { header, .. } => Some(header),
                    _ => None,
                })
                .collect()
        };
        assert_eq!(header_flags("| a |
|---|
| 1 |"), vec![true]);
        assert_eq!(header_flags("| a |
| 1 |
|---|"), vec![false]);
        assert_eq!(header_flags("| a |
| 1 |"), vec![false]);
        assert_eq!(header_flags("---
| a |"), vec![false]);
    }

    #[test]
    fn code_block_lines_are_verbatim() {
        assert_eq!(
            blocks("```\nconsole.log(1)\n```"),
            vec![Block::CodeBlock {
                language: None,
                lines: vec!["console.log(1)".to_string()],
            }]
        );
    }

    #[test]
    fn code_block_keeps_indentation_and_markup() {
        let md = "```javascript\n  **not bold**\n| not | table |\n# not heading\n```";
        assert_eq!(
            blocks(md),
            vec![Block::CodeBlock {
                language: Some("javascript".to_string()),
                lines: vec![
                    "  **not bold**".to_string(),
                    "| not | table |".to_string(),
                    "# not heading".to_string(),
                ],
            }]
        );
    }

    #[test]
    fn fence_with_info_inside_code_does_not_close() {
        let doc = parse("```\n```rust\n", &Config::default());
        assert_eq!(
            doc.blocks(),
            &[Block::CodeBlock {
                language: None,
                lines: vec!["```rust".to_string()],
            }]
        );
        assert_eq!(
            doc.diagnostics(),
            &[Diagnostic::UnterminatedCodeFence { line: 1 }]
        );
    }

    #[test]
    fn unterminated_fence_flushes_at_end() {
        let doc = parse("intro\n```\na\n\nb", &Config::default());
        assert_eq!(
            doc.blocks()[1],
            Block::CodeBlock {
                language: None,
                lines: vec!["a".to_string(), String::new(), "b".to_string()],
            }
        );
        assert_eq!(
            doc.diagnostics(),
            &[Diagnostic::UnterminatedCodeFence { line: 2 }]
        );
    }

    #[test]
    fn unterminated_emphasis_is_literal() {
        let doc = parse("Hello **world", &Config::default());
        assert_eq!(
            doc.blocks(),
            &[Block::Paragraph {
                content: vec![Span::plain("Hello **world")],
            }]
        );
        assert_eq!(
            doc.diagnostics(),
            &[Diagnostic::UnterminatedEmphasisMarker {
                line: 1,
                marker: '*'
            }]
        );
    }

    #[test]
    fn line_after_table_is_reprocessed() {
        assert_eq!(
            blocks("| a |\n# After"),
            vec![
                Block::Table {
                    rows: vec![cells(&["a"])],
                    widths: ColumnWidths::new(vec![3]),
                    header: false,
                },
                Block::Heading {
                    level: 1,
                    content: vec![Span::plain("After")],
                },
            ]
        );
    }

    #[test]
    fn fence_right_after_table_opens_code_block() {
        let result = blocks("| a |\n```\nx\n```");
        assert!(matches!(result[0], Block::Table { .. }));
        assert_eq!(
            result[1],
            Block::CodeBlock {
                language: None,
                lines: vec!["x".to_string()],
            }
        );
    }

    #[test]
    fn one_table_per_run_of_rows() {
        let md = "| a |\n| b |\n\n| c |\ntext\n| d |";
        let tables = blocks(md)
            .iter()
            .filter(|b| matches!(b, Block::Table { .. }))
            .count();
        assert_eq!(tables, 3);
    }

    #[test]
    fn ragged_rows_are_kept_and_reported() {
        let doc = parse("| a | b |\n| 1 |\n| x | y | z |", &Config::default());
        assert_eq!(
            doc.blocks(),
            &[Block::Table {
                rows: vec![cells(&["a", "b"]), cells(&["1"]), cells(&["x", "y", "z"])],
                widths: ColumnWidths::new(vec![3, 3, 3]),
                header: false,
            }]
        );
        assert_eq!(
            doc.diagnostics(),
            &[
                Diagnostic::MalformedTableRow {
                    line: 2,
                    expected: 2,
                    found: 1
                },
                Diagnostic::MalformedTableRow {
                    line: 3,
                    expected: 2,
                    found: 3
                },
            ]
        );
    }

    #[test]
    fn table_cells_are_inline_parsed() {
        assert_eq!(
            blocks("| **k** | a<br>b |  |"),
            vec![Block::Table {
                rows: vec![vec![
                    vec![Span::bold("k")],
                    vec![Span::plain("a"), Span::line_break(), Span::plain("b")],
                    vec![],
                ]],
                widths: ColumnWidths::new(vec![3, 4, 2]),
                header: false,
            }]
        );
    }

    #[test]
    fn list_items() {
        assert_eq!(
            blocks("- one\n2. *two*"),
            vec![
                Block::ListItem {
                    marker: ListMarker::Bullet,
                    content: vec![Span::plain("one")],
                },
                Block::ListItem {
                    marker: ListMarker::Ordered(2),
                    content: vec![Span::italic("two")],
                },
            ]
        );
    }

    #[test]
    fn separator_outside_table_is_dropped() {
        assert_eq!(
            blocks("above\n---\nbelow"),
            vec![
                Block::Paragraph {
                    content: vec![Span::plain("above")],
                },
                Block::Paragraph {
                    content: vec![Span::plain("below")],
                },
            ]
        );
    }

    #[test]
    fn crlf_input() {
        assert_eq!(
            blocks("# A\r\n\r\nb\r\n"),
            vec![
                Block::Heading {
                    level: 1,
                    content: vec![Span::plain("A")],
                },
                Block::Blank,
                Block::Paragraph {
                    content: vec![Span::plain("b")],
                },
            ]
        );
    }

    #[test]
    fn empty_input_has_no_blocks() {
        for input in ["", "\n\n", "   \n\t\n"] {
            let doc = parse(input, &Config::default());
            assert!(doc.is_empty(), "{input:?}");
            assert_eq!(doc.diagnostics(), &[Diagnostic::EmptyInput]);
        }
    }

    #[test]
    fn column_widths_follow_config() {
        let config = Config::default().with_max_column_width(5);
        let doc = parse("| abcdefgh | a |", &config);
        let (_, widths) = doc.tables().next().unwrap();
        assert_eq!(widths.as_slice(), &[5, 3]);
    }

    #[test]
    fn frontmatter_is_stripped_when_enabled() {
        let md = "---\ntitle: x\n---\n# Body\n**oops";
        let mut config = Config::default();
        config.input.strip_front_matter = true;
        let doc = parse(md, &config);
        assert_eq!(
            doc.blocks()[0],
            Block::Heading {
                level: 1,
                content: vec![Span::plain("Body")],
            }
        );
        // Line numbers still refer to the original input
        assert_eq!(
            doc.diagnostics(),
            &[Diagnostic::UnterminatedEmphasisMarker {
                line: 5,
                marker: '*'
            }]
        );
    }

    #[test]
    fn frontmatter_is_kept_by_default() {
        let result = blocks("---\ntitle: x\n---\n");
        assert_eq!(
            result,
            vec![Block::Paragraph {
                content: vec![Span::plain("title: x")],
            }]
        );
    }

    #[test]
    fn strip_frontmatter_without_close_is_noop() {
        assert_eq!(strip_frontmatter("---\nno close"), ("---\nno close", 0));
        assert_eq!(strip_frontmatter("---\na: 1\n---"), ("", 2));
    }
}
