use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;

use crate::error::ConfigError;

/// Default cap for table column widths, in character units.
pub const DEFAULT_MAX_COLUMN_WIDTH: u32 = 45;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Conversion options. Built once and passed by reference into every call.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub table: TableConfig,
    pub heading: HeadingConfig,
    pub input: InputConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Artifact name without extension.
    pub filename: String,
    pub format: Format,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            filename: "document".to_string(),
            format: Format::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableConfig {
    pub max_column_width: u32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HeadingConfig {
    /// Scale heading size by level. When false every heading is rendered
    /// as flat bold text.
    pub scale: bool,
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self { scale: true }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct InputConfig {
    /// Drop a leading `---` delimited YAML block before parsing.
    pub strip_front_matter: bool,
}

/// Output artifact kind.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// PDF compiled through Typst.
    #[default]
    Pdf,
    /// Typst markup, as fed to the PDF compiler.
    Typst,
    /// Spreadsheet-flavored HTML workbook.
    Sheet,
    /// Document-flavored HTML article.
    Article,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Pdf => "pdf",
            Format::Typst => "typ",
            Format::Sheet => "xls",
            Format::Article => "doc",
        }
    }
}

impl FromStr for Format {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(Format::Pdf),
            "typst" | "typ" => Ok(Format::Typst),
            "sheet" | "xls" => Ok(Format::Sheet),
            "article" | "doc" => Ok(Format::Article),
            other => Err(ConfigError::Invalid(format!("unknown format `{other}`"))),
        }
    }
}

impl Config {
    /// The defaults embedded from `default_config.toml`.
    pub fn compiled_default() -> Self {
        // build.rs rejects an invalid default_config.toml
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file, or return defaults if not found.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::compiled_default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table.max_column_width == 0 {
            return Err(ConfigError::Invalid(
                "table.max_column_width must be at least 1".to_string(),
            ));
        }
        if self.output.filename.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "output.filename must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.output.format = format;
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.output.filename = filename.into();
        self
    }

    pub fn with_max_column_width(mut self, width: u32) -> Self {
        self.table.max_column_width = width;
        self
    }

    /// `{filename}.{extension}` for the configured format.
    pub fn suggested_name(&self) -> String {
        format!("{}.{}", self.output.filename, self.output.format.extension())
    }
}
