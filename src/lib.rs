//! Convert a markdown subset into a structured document and render it to
//! spreadsheet-like or document-like artifacts.
//!
//! ```
//! use mdexport::{Block, Config, Span};
//!
//! let doc = mdexport::convert("# Title\n\nHello **world**", &Config::default());
//! assert_eq!(
//!     doc.blocks()[2],
//!     Block::Paragraph {
//!         content: vec![Span::plain("Hello "), Span::bold("world")],
//!     }
//! );
//! ```

mod block;
mod config;
mod error;
mod grid;
mod html;
mod inline;
mod line;
mod parser;
mod sink;
mod typst;
mod width;

pub use block::{Block, Cell, ColumnWidths, Document, ListMarker, RichText, Row, Span, plain_text};
pub use config::{
    Config, DEFAULT_MAX_COLUMN_WIDTH, Format, HeadingConfig, InputConfig, OutputConfig,
    TableConfig,
};
pub use error::{ConfigError, Diagnostic, ExportError};
pub use grid::{Grid, GridRow};
pub use html::{HtmlArticle, HtmlWorkbook};
pub use sink::{ArtifactSink, FileSink, FlowSink, GridSink, MemorySink};
pub use typst::{Pdf, TypstMarkup};
pub use width::{COLUMN_PADDING, text_width};

/// Parse markdown text using default config.
pub fn parse(markdown: &str) -> Document {
    convert(markdown, &Config::compiled_default())
}

/// Convert markdown into a document.
///
/// Never fails: problems in the input are recorded as diagnostics.
pub fn convert(markdown: &str, config: &Config) -> Document {
    parser::parse(markdown, config)
}

/// Parse an inline fragment into styled spans.
pub fn parse_inline(text: &str) -> RichText {
    inline::parse(text)
}

/// Estimate the column widths of one table.
pub fn estimate_column_widths(rows: &[Row], config: &Config) -> ColumnWidths {
    width::estimate(rows, config.table.max_column_width)
}

/// Convert markdown to Typst markup using default config.
pub fn markdown_to_typst(markdown: &str) -> String {
    let config = Config::compiled_default();
    typst::blocks_to_typst(convert(markdown, &config).blocks(), &config)
}

/// Convert markdown to PDF bytes.
pub fn markdown_to_pdf(markdown: &str, config: &Config) -> Result<Vec<u8>, ExportError> {
    Pdf.render(&convert(markdown, config), config)
}

/// Render a document in the configured output format.
pub fn render(document: &Document, config: &Config) -> Result<Vec<u8>, ExportError> {
    match config.output.format {
        Format::Pdf => Pdf.render(document, config),
        Format::Typst => TypstMarkup.render(document, config),
        Format::Article => HtmlArticle.render(document, config),
        Format::Sheet => HtmlWorkbook.render(&Grid::from_document(document), config),
    }
}

/// Render a document and hand the bytes to `sink` once.
///
/// The document is only borrowed, so a failing render or delivery leaves
/// it untouched.
pub fn export(
    document: &Document,
    config: &Config,
    sink: &mut impl ArtifactSink,
) -> Result<(), ExportError> {
    let buffer = render(document, config)?;
    let name = config.suggested_name();
    tracing::debug!(name = %name, bytes = buffer.len(), "rendered artifact");
    sink.deliver(buffer, &name)
}
