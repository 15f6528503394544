use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mdexport::{Config, FileSink, Format, OutputConfig};

#[derive(Parser)]
#[command(name = "mdexport", version)]
#[command(about = "Convert Markdown to PDF, spreadsheet or document files")]
struct Cli {
    /// Input Markdown file
    input: PathBuf,

    /// Output file (defaults to input name with the format's extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: pdf, typst, sheet or article
    #[arg(short, long)]
    format: Option<Format>,

    /// TOML config file
    #[arg(short, long, default_value = "mdexport.toml")]
    config: PathBuf,

    /// Maximum table column width in character units
    #[arg(long)]
    max_column_width: Option<u32>,

    /// Log conversion details
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    // --verbose enables INFO level, otherwise use RUST_LOG
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = apply_overrides(Config::load(&cli.config)?, &cli);
    config.validate()?;

    // Read input file
    let markdown = fs::read_to_string(&cli.input)
        .map_err(|e| format!("reading {}: {}", cli.input.display(), e))?;

    let document = mdexport::convert(&markdown, &config);
    for diagnostic in document.diagnostics() {
        tracing::warn!("{}: {}", cli.input.display(), diagnostic);
    }

    // Determine output path
    let output = cli
        .output
        .unwrap_or_else(|| cli.input.with_extension(config.output.format.extension()));

    let mut sink = FileSink::to_file(&output);
    mdexport::export(&document, &config, &mut sink)?;

    println!("Created {}", output.display());
    Ok(())
}

/// Layer command line flags over the loaded config. The input file name
/// only replaces `[output] filename` when the config left it at the default.
fn apply_overrides(mut config: Config, cli: &Cli) -> Config {
    if let Some(format) = cli.format {
        config = config.with_format(format);
    }
    if let Some(width) = cli.max_column_width {
        config = config.with_max_column_width(width);
    }
    if config.output.filename == OutputConfig::default().filename
        && let Some(stem) = cli.input.file_stem()
    {
        config = config.with_filename(stem.to_string_lossy());
    }
    config
}
