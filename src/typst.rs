use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_pdf::PdfOptions;

use crate::block::{Block, ColumnWidths, Document, ListMarker, Row, Span};
use crate::config::Config;
use crate::error::ExportError;
use crate::sink::FlowSink;

/// Flow sink producing Typst markup.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypstMarkup;

impl FlowSink for TypstMarkup {
    fn render(&self, document: &Document, config: &Config) -> Result<Vec<u8>, ExportError> {
        Ok(blocks_to_typst(document.blocks(), config).into_bytes())
    }
}

/// Flow sink producing PDF bytes through Typst.
#[derive(Debug, Default, Clone, Copy)]
pub struct Pdf;

impl FlowSink for Pdf {
    fn render(&self, document: &Document, config: &Config) -> Result<Vec<u8>, ExportError> {
        compile_pdf(blocks_to_typst(document.blocks(), config))
    }
}

fn compile_pdf(typst_content: String) -> Result<Vec<u8>, ExportError> {
    use typst_library::layout::PagedDocument;

    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(false);

    let engine = TypstEngine::builder()
        .main_file(typst_content)
        .search_fonts_with(font_options)
        .build();

    let doc: PagedDocument = engine
        .compile()
        .output
        .map_err(|e| ExportError::Typst(format!("{:?}", e)))?;

    typst_pdf::pdf(&doc, &PdfOptions::default()).map_err(|e| ExportError::Pdf(format!("{:?}", e)))
}

/// Convert blocks to Typst markup
pub fn blocks_to_typst(blocks: &[Block], config: &Config) -> String {
    let mut out = String::new();

    // Set up paragraph settings to prevent widows/orphans
    out.push_str("#set par(linebreaks: \"optimized\")\n\n");

    let mut i = 0;
    while i < blocks.len() {
        let block = &blocks[i];

        match block {
            Block::Heading { .. } => {
                // Keep heading with following content using a block that prevents breaks
                out.push_str("#block(breakable: false)[\n");
                emit_heading(block, config, &mut out);

                if let Some(
                    next @ (Block::Paragraph { .. }
                    | Block::CodeBlock { .. }
                    | Block::Table { .. }),
                ) = blocks.get(i + 1)
                {
                    i += 1;
                    emit_block(next, config, &mut out);
                }
                out.push_str("]\n\n");
            }
            Block::ListItem { .. } => {
                emit_block(block, config, &mut out);
                // A list ends at the first non-item block
                if !matches!(blocks.get(i + 1), Some(Block::ListItem { .. })) {
                    out.push('\n');
                }
            }
            _ => {
                emit_block(block, config, &mut out);
            }
        }

        i += 1;
    }

    out
}

fn emit_heading(block: &Block, config: &Config, out: &mut String) {
    if let Block::Heading { level, content } = block {
        if config.heading.scale {
            for _ in 0..*level {
                out.push('=');
            }
            out.push(' ');
            spans_to_typst(content, out);
        } else {
            out.push_str("#strong[");
            spans_to_typst(content, out);
            out.push_str("];");
        }
        out.push('\n');
        out.push('\n');
    }
}

fn emit_block(block: &Block, config: &Config, out: &mut String) {
    match block {
        Block::Heading { .. } => {
            emit_heading(block, config, out);
        }
        Block::Paragraph { content } => {
            spans_to_typst(content, out);
            out.push('\n');
            out.push('\n');
        }
        Block::CodeBlock { language, lines } => {
            // The fence must be longer than any backtick run in the code
            let longest_run = lines
                .iter()
                .flat_map(|line| line.split(|c: char| c != '`'))
                .map(str::len)
                .max()
                .unwrap_or(0);
            let fence = "`".repeat(longest_run.max(2) + 1);

            // Keep code blocks together when possible
            out.push_str("#block(breakable: false)[\n");
            out.push_str(&fence);
            if let Some(lang) = language {
                out.push_str(lang);
            }
            out.push('\n');
            for line in lines {
                out.push_str(line);
                out.push('\n');
            }
            out.push_str(&fence);
            out.push_str("\n]\n\n");
        }
        Block::ListItem { marker, content } => {
            match marker {
                ListMarker::Bullet => out.push_str("- "),
                ListMarker::Ordered(n) => out.push_str(&format!("{n}. ")),
            }
            spans_to_typst(content, out);
            out.push('\n');
        }
        Block::Table {
            rows,
            widths,
            header,
        } => {
            // Keep tables together when possible
            out.push_str("#block(breakable: false)[\n");
            table_to_typst(rows, widths, *header, out);
            out.push_str("]\n\n");
        }
        Block::Blank => {}
    }
}

fn spans_to_typst(spans: &[Span], out: &mut String) {
    for span in spans {
        span_to_typst(span, out);
    }
}

fn span_to_typst(span: &Span, out: &mut String) {
    if span.is_line_break() {
        out.push_str(" \\ ");
        return;
    }
    if span.text.is_empty() {
        return;
    }

    let mut inner = String::new();
    if span.code {
        inner.push_str("#raw(\"");
        for ch in span.text.chars() {
            if matches!(ch, '"' | '\\') {
                inner.push('\\');
            }
            inner.push(ch);
        }
        inner.push_str("\");");
    } else {
        escape_text(&span.text, &mut inner);
    }

    // Function syntax works inside words, unlike `*strong*` markup
    if span.italic {
        inner = format!("#emph[{inner}];");
    }
    if span.bold {
        inner = format!("#strong[{inner}];");
    }
    out.push_str(&inner);
    if span.breaks_after {
        out.push_str(" \\ ");
    }
}

fn escape_text(text: &str, out: &mut String) {
    // `1. ` at the start of content would open a numbered list
    let digits = text.bytes().take_while(u8::is_ascii_digit).count();
    let enum_dot = digits > 0
        && text[digits..].starts_with('.')
        && text[digits + 1..]
            .chars()
            .next()
            .is_none_or(char::is_whitespace);

    // Escape special Typst characters
    for (index, ch) in text.char_indices() {
        if enum_dot && index == digits {
            out.push_str("\\.");
            continue;
        }
        match ch {
            '#' | '*' | '_' | '@' | '$' | '\\' | '`' | '<' | '>' | '[' | ']' | '=' | '/' | '~'
            | '-' | '+' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
}

fn table_to_typst(rows: &[Row], widths: &ColumnWidths, header: bool, out: &mut String) {
    let col_count = widths.len();
    if col_count == 0 {
        return;
    }

    let columns: Vec<String> = widths.as_slice().iter().map(|w| format!("{w}fr")).collect();
    out.push_str("#table(\n");
    out.push_str(&format!("  columns: ({},),\n", columns.join(", ")));

    // Short rows are padded with empty cells so Typst keeps the row grid
    for (index, row) in rows.iter().enumerate() {
        let strong = header && index == 0;
        for cell in row {
            out.push_str("  [");
            if strong {
                out.push_str("#strong[");
                spans_to_typst(cell, out);
                out.push_str("];");
            } else {
                spans_to_typst(cell, out);
            }
            out.push_str("],\n");
        }
        for _ in row.len()..col_count {
            out.push_str("  [],\n");
        }
    }

    out.push_str(")\n");
}
