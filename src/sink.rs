//! Render and delivery contracts.
//!
//! A finished [`Document`] goes to exactly one renderer: a [`GridSink`]
//! (spreadsheet-like, fed a flattened [`Grid`]) or a [`FlowSink`]
//! (document-like, fed the blocks directly). The resulting bytes are handed
//! to an [`ArtifactSink`] once, after rendering has completed.

use std::fs;
use std::path::{Path, PathBuf};

use crate::block::Document;
use crate::config::Config;
use crate::error::ExportError;
use crate::grid::Grid;

/// Renders a grid layout into a spreadsheet-like artifact.
pub trait GridSink {
    fn render(&self, grid: &Grid<'_>, config: &Config) -> Result<Vec<u8>, ExportError>;
}

/// Renders the block sequence into a document-like artifact.
pub trait FlowSink {
    fn render(&self, document: &Document, config: &Config) -> Result<Vec<u8>, ExportError>;
}

/// Receives the finished artifact.
pub trait ArtifactSink {
    fn deliver(&mut self, buffer: Vec<u8>, suggested_name: &str) -> Result<(), ExportError>;
}

/// Writes artifacts to disk.
#[derive(Debug, Clone)]
pub struct FileSink {
    target: Target,
    written: Option<PathBuf>,
}

#[derive(Debug, Clone)]
enum Target {
    /// Write `<dir>/<suggested name>`.
    Dir(PathBuf),
    /// Write exactly this path, ignoring the suggested name.
    File(PathBuf),
}

impl FileSink {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            target: Target::Dir(dir.into()),
            written: None,
        }
    }

    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            target: Target::File(path.into()),
            written: None,
        }
    }

    /// Path of the last artifact written.
    pub fn written(&self) -> Option<&Path> {
        self.written.as_deref()
    }
}

impl ArtifactSink for FileSink {
    fn deliver(&mut self, buffer: Vec<u8>, suggested_name: &str) -> Result<(), ExportError> {
        let path = match &self.target {
            Target::Dir(dir) => dir.join(suggested_name),
            Target::File(path) => path.clone(),
        };
        fs::write(&path, buffer).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), "wrote artifact");
        self.written = Some(path);
        Ok(())
    }
}

/// Keeps delivered artifacts in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub artifacts: Vec<(String, Vec<u8>)>,
}

impl ArtifactSink for MemorySink {
    fn deliver(&mut self, buffer: Vec<u8>, suggested_name: &str) -> Result<(), ExportError> {
        self.artifacts.push((suggested_name.to_string(), buffer));
        Ok(())
    }
}
