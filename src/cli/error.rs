//! CLI error types

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::export::ExportError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error("Failed to write {0}: {1}")]
    FileWriteError(PathBuf, String),

    #[error("Failed to parse records: {0}")]
    ParseError(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}
