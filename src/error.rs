//! Diagnostics and error types.
//!
//! Parsing never fails: problems in the markdown are recorded as
//! [`Diagnostic`]s on the resulting document. Rendering, delivery and
//! config loading can fail and return [`ExportError`] or [`ConfigError`].

use std::path::PathBuf;

/// A tolerated problem found while converting markdown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Diagnostic {
    /// A table row whose cell count differs from the table's first row.
    /// The row is kept unchanged.
    #[error("line {line}: table row has {found} cells, expected {expected}")]
    MalformedTableRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A code fence that is never closed. The block runs to end of input.
    #[error("line {line}: code fence is never closed")]
    UnterminatedCodeFence { line: usize },

    /// An emphasis or code delimiter without a matching close. The
    /// delimiter is kept as literal text.
    #[error("line {line}: unterminated `{marker}` kept as text")]
    UnterminatedEmphasisMarker { line: usize, marker: char },

    /// The input has no non-blank lines.
    #[error("input is empty")]
    EmptyInput,
}

/// Error while rendering or delivering an artifact.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Typst failed to compile the generated markup.
    #[error("Typst compilation failed: {0}")]
    Typst(String),

    /// Typst compiled but PDF export failed.
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    /// Writing the artifact failed.
    #[error("failed to write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file exists but could not be read.
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`Config`](crate::Config).
    #[error("invalid config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A value is out of range.
    #[error("invalid config value: {0}")]
    Invalid(String),
}
