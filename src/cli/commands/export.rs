//! Export command implementation

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::cli::error::CliError;
use crate::cli::output::format_summary;
use crate::config::{ExportConfig, RowFailurePolicy};
use crate::export::{PdaExporter, StoredIbanResolver};
use crate::models::ExportRecord;

/// Serialization of the records file
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    Json,
    Yaml,
}

impl InputFormat {
    /// Guess the format from a file extension, defaulting to JSON
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => InputFormat::Yaml,
            _ => InputFormat::Json,
        }
    }
}

/// Arguments for the `export` command
#[derive(Debug, Clone)]
pub struct ExportArgs {
    /// Records file (`-` for stdin)
    pub input: String,
    /// Records format, inferred from the extension when absent
    pub format: Option<InputFormat>,
    /// Output file, stdout when absent
    pub output: Option<PathBuf>,
    /// TOML configuration file
    pub config: Option<PathBuf>,
    /// Skip rows that fail to render instead of aborting
    pub skip_failed_rows: bool,
    /// Accept records from different mandates or contract types
    pub allow_mixed: bool,
}

/// Read a JSON or YAML array of records
pub fn load_records(input: &str, format: Option<InputFormat>) -> Result<Vec<ExportRecord>, CliError> {
    let (content, format) = if input == "-" {
        let content = read_stdin(std::io::stdin())?;
        (content, format.unwrap_or(InputFormat::Json))
    } else {
        let path = PathBuf::from(input);
        let content = std::fs::read_to_string(&path)
            .map_err(|e| CliError::FileReadError(path.clone(), e.to_string()))?;
        (content, format.unwrap_or_else(|| InputFormat::from_path(&path)))
    };

    match format {
        InputFormat::Json => {
            serde_json::from_str(&content).map_err(|e| CliError::ParseError(e.to_string()))
        }
        InputFormat::Yaml => {
            serde_yaml::from_str(&content).map_err(|e| CliError::ParseError(e.to_string()))
        }
    }
}

/// Read all of standard input, reported like any other input file named `-`
fn read_stdin(mut reader: impl Read) -> Result<String, CliError> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|e| CliError::FileReadError(PathBuf::from("-"), e.to_string()))?;
    Ok(content)
}

fn build_config(args: &ExportArgs) -> Result<ExportConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => ExportConfig::from_file(path)?,
        None => ExportConfig::default(),
    };
    if args.skip_failed_rows {
        config = config.with_row_failure_policy(RowFailurePolicy::SkipRow);
    }
    if args.allow_mixed {
        config = config.with_require_homogeneous(false);
    }
    Ok(config)
}

/// Handle the `export` command
pub fn handle_export(args: &ExportArgs) -> Result<(), CliError> {
    let config = build_config(args)?;
    let records = load_records(&args.input, args.format)?;

    let exporter = PdaExporter::with_config(StoredIbanResolver, config)?;
    let result = exporter.export(&records)?;

    match &args.output {
        Some(path) => std::fs::write(path, &result.content)
            .map_err(|e| CliError::FileWriteError(path.clone(), e.to_string()))?,
        None => print!("{}", result.content),
    }

    eprint!("{}", format_summary(&result));
    Ok(())
}
