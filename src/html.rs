//! HTML fallback renderers.
//!
//! Spreadsheet and word-processor applications open Office-flavored HTML
//! directly, so these two sinks produce a usable `.xls` / `.doc` without a
//! binary encoder. Cells are capped at 320px, the pixel equivalent of the
//! default 45-unit column cap.

use html_escape::encode_text;

use crate::block::{Block, Document, ListMarker, Row, Span};
use crate::config::Config;
use crate::error::ExportError;
use crate::grid::{Grid, GridRow};
use crate::sink::{FlowSink, GridSink};

/// Approximate pixels per column width unit.
const PX_PER_UNIT: u32 = 7;

const CELL_STYLE: &str =
    "border:1px solid #ddd;padding:5px;white-space:pre-wrap;word-wrap:break-word;max-width:320px";

/// Bold on a grey fill, for the row above a table's separator.
const HEADER_CELL_STYLE: &str = "border:1px solid #ddd;padding:5px;white-space:pre-wrap;\
    word-wrap:break-word;max-width:320px;font-weight:bold;background-color:#d9d9d9";

const WORKBOOK_STYLE: &str = "td { max-width: 320px; word-wrap: break-word; }\n\
    table { table-layout: auto; width: 100%; }";

const ARTICLE_TABLE_STYLE: &str =
    "border-collapse:collapse;width:100%;max-width:100%;margin:15px 0";

/// Grid sink producing a spreadsheet-flavored HTML table.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlWorkbook;

impl GridSink for HtmlWorkbook {
    fn render(&self, grid: &Grid<'_>, config: &Config) -> Result<Vec<u8>, ExportError> {
        Ok(grid_to_html(grid, config).into_bytes())
    }
}

/// Flow sink producing a document-flavored HTML article.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlArticle;

impl FlowSink for HtmlArticle {
    fn render(&self, document: &Document, config: &Config) -> Result<Vec<u8>, ExportError> {
        Ok(document_to_html(document, config).into_bytes())
    }
}

fn heading_font_px(level: u8) -> u32 {
    24u32.saturating_sub(u32::from(level.saturating_sub(1)) * 2)
}

fn spans_to_html(spans: &[Span], out: &mut String) {
    for span in spans {
        if span.is_line_break() {
            out.push_str("<br>");
            continue;
        }
        let mut inner = encode_text(&span.text).into_owned();
        if span.code {
            inner = format!("<code>{inner}</code>");
        }
        if span.italic {
            inner = format!("<em>{inner}</em>");
        }
        if span.bold {
            inner = format!("<strong>{inner}</strong>");
        }
        out.push_str(&inner);
        if span.breaks_after {
            out.push_str("<br>");
        }
    }
}

fn list_prefix(marker: ListMarker) -> String {
    match marker {
        ListMarker::Bullet => "• ".to_string(),
        ListMarker::Ordered(n) => format!("{n}. "),
    }
}

/// Render a grid as an Office-flavored HTML workbook.
pub fn grid_to_html(grid: &Grid<'_>, config: &Config) -> String {
    let mut out = String::new();
    out.push_str(
        "<html xmlns:o=\"urn:schemas-microsoft-com:office:office\" \
         xmlns:x=\"urn:schemas-microsoft-com:office:excel\" \
         xmlns=\"http://www.w3.org/TR/REC-html40\">\n",
    );
    push_head(&config.output.filename, WORKBOOK_STYLE, &mut out);
    out.push_str("<body>\n<table>\n");

    if !grid.columns().is_empty() {
        out.push_str("<colgroup>");
        for width in grid.columns() {
            out.push_str(&format!("<col style=\"width:{}px\">", width * PX_PER_UNIT));
        }
        out.push_str("</colgroup>\n");
    }

    let span = grid.span();
    for row in grid.rows() {
        match row {
            GridRow::Heading { level, content } => {
                let style = if config.heading.scale {
                    format!(
                        "font-size:{}px;font-weight:bold;padding:10px 0",
                        heading_font_px(*level)
                    )
                } else {
                    "font-weight:bold;padding:10px 0".to_string()
                };
                push_full_width(span, &style, &mut out, |out| spans_to_html(content, out));
            }
            GridRow::Text { content } => {
                push_full_width(span, "padding:5px 0;white-space:pre-wrap", &mut out, |out| {
                    spans_to_html(content, out)
                });
            }
            GridRow::ListItem { marker, content } => {
                push_full_width(span, "padding:2px 0;white-space:pre-wrap", &mut out, |out| {
                    out.push_str(&list_prefix(*marker));
                    spans_to_html(content, out);
                });
            }
            GridRow::Code { lines, .. } => {
                push_full_width(
                    span,
                    "font-family:'Courier New',monospace;white-space:pre-wrap",
                    &mut out,
                    |out| {
                        let escaped: Vec<String> =
                            lines.iter().map(|l| encode_text(l).into_owned()).collect();
                        out.push_str(&escaped.join("<br>"));
                    },
                );
            }
            GridRow::Blank => {
                out.push_str(&format!("<tr><td colspan=\"{span}\"></td></tr>\n"));
            }
            GridRow::Cells { cells, header } => {
                let style = if *header { HEADER_CELL_STYLE } else { CELL_STYLE };
                out.push_str("<tr>");
                for cell in cells.iter() {
                    out.push_str(&format!("<td style=\"{style}\">"));
                    spans_to_html(cell, &mut out);
                    out.push_str("</td>");
                }
                out.push_str("</tr>\n");
            }
        }
    }

    out.push_str("</table>\n</body>\n</html>\n");
    out
}

fn push_head(title: &str, style: &str, out: &mut String) {
    out.push_str("<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", encode_text(title)));
    out.push_str(&format!(
        "<style>\ntd, th, tr, h1, h2, h3 {{ max-width: 320px; }}\n{style}\n</style>\n"
    ));
    out.push_str("</head>\n");
}

fn push_full_width(span: usize, style: &str, out: &mut String, body: impl FnOnce(&mut String)) {
    out.push_str(&format!("<tr><td colspan=\"{span}\" style=\"{style}\">"));
    body(out);
    out.push_str("</td></tr>\n");
}

/// Render a document as an Office-flavored HTML article.
pub fn document_to_html(document: &Document, config: &Config) -> String {
    let mut out = String::new();
    out.push_str(
        "<html xmlns:o=\"urn:schemas-microsoft-com:office:office\" \
         xmlns:w=\"urn:schemas-microsoft-com:office:word\" \
         xmlns=\"http://www.w3.org/TR/REC-html40\">\n",
    );
    push_head(
        &config.output.filename,
        "table { border-collapse: collapse; width: 100%; margin: 10px 0; }\n\
         td { border: 1px solid #ddd; padding: 8px; word-wrap: break-word; }\n\
         h1 { font-size: 24px; border-bottom: 2px solid #eee; }\n\
         h2 { font-size: 22px; }\n\
         h3 { font-size: 20px; }",
        &mut out,
    );
    out.push_str("<body>\n");

    let mut open_list: Option<&'static str> = None;
    for block in document.blocks() {
        let wanted = match block {
            Block::ListItem {
                marker: ListMarker::Bullet,
                ..
            } => Some("ul"),
            Block::ListItem { .. } => Some("ol"),
            _ => None,
        };
        if open_list != wanted {
            if let Some(tag) = open_list {
                out.push_str(&format!("</{tag}>\n"));
            }
            if let Some(tag) = wanted {
                out.push_str(&format!("<{tag}>\n"));
            }
            open_list = wanted;
        }

        match block {
            Block::Heading { level, content } => {
                if config.heading.scale {
                    out.push_str(&format!("<h{level}>"));
                    spans_to_html(content, &mut out);
                    out.push_str(&format!("</h{level}>\n"));
                } else {
                    out.push_str("<p><strong>");
                    spans_to_html(content, &mut out);
                    out.push_str("</strong></p>\n");
                }
            }
            Block::Paragraph { content } => {
                out.push_str("<p style=\"margin:10px 0\">");
                spans_to_html(content, &mut out);
                out.push_str("</p>\n");
            }
            Block::CodeBlock { lines, .. } => {
                out.push_str("<pre style=\"font-family:'Courier New',monospace\"><code>");
                out.push_str(&encode_text(&lines.join("\n")));
                out.push_str("</code></pre>\n");
            }
            Block::ListItem { marker, content } => {
                match marker {
                    ListMarker::Ordered(n) => out.push_str(&format!("<li value=\"{n}\">")),
                    ListMarker::Bullet => out.push_str("<li>"),
                }
                spans_to_html(content, &mut out);
                out.push_str("</li>\n");
            }
            Block::Table { rows, header, .. } => table_to_html(rows, *header, &mut out),
            Block::Blank => {}
        }
    }
    if let Some(tag) = open_list {
        out.push_str(&format!("</{tag}>\n"));
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn table_to_html(rows: &[Row], header: bool, out: &mut String) {
    out.push_str(&format!("<table border=\"1\" style=\"{ARTICLE_TABLE_STYLE}\">\n"));
    for (index, row) in rows.iter().enumerate() {
        let (tag, style) = if header && index == 0 {
            ("th", HEADER_CELL_STYLE)
        } else {
            ("td", CELL_STYLE)
        };
        out.push_str("<tr>");
        for cell in row {
            out.push_str(&format!("<{tag} style=\"{style}\">"));
            spans_to_html(cell, out);
            out.push_str(&format!("</{tag}>"));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
}
