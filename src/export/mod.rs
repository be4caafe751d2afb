//! Export functionality
//!
//! Renders contract applications into semicolon-delimited text, one schema
//! per mandate:
//! - Field formatters (dates, flags, case normalization)
//! - Schema registry (mandate + contract type to column layout)
//! - Row renderer
//! - Exporter driving the whole pipeline

pub mod energy;
pub mod exporter;
pub mod formatters;
pub mod renderer;
pub mod resolver;
pub mod schema;
pub mod telecom;

use crate::config::ConfigError;
use crate::models::{ExportRecord, Mandate};

/// Field separator
pub const DELIMITER: char = ';';

/// Line terminator, written after every line including the last
pub const LINE_SEPARATOR: char = '\n';

/// Result of an export operation
#[derive(Debug)]
pub struct ExportResult {
    /// Exported content: header line followed by one line per rendered record
    pub content: String,
    /// Format identifier
    pub format: String,
    /// Mandate whose schema was used
    pub mandate: Mandate,
    /// Schema variant used
    pub variant: SchemaVariant,
    /// Number of body rows written
    pub rows: usize,
    /// Rows left out under [`RowFailurePolicy::SkipRow`](crate::config::RowFailurePolicy)
    pub skipped: Vec<RowError>,
}

/// Failure of a single column while rendering a row
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Column '{column}' failed")]
pub struct CellError {
    pub column: &'static str,
    pub source: ResolveError,
}

/// Failure of a single row, with enough context to find the record again
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Row {index} (record {}) failed at column '{column}'", display_id(.record_id))]
pub struct RowError {
    /// Position of the record in the input
    pub index: usize,
    pub record_id: Option<i64>,
    pub column: &'static str,
    #[source]
    pub source: ResolveError,
}

impl RowError {
    pub fn new(index: usize, record: &ExportRecord, cell: CellError) -> Self {
        Self {
            index,
            record_id: record.id,
            column: cell.column,
            source: cell.source,
        }
    }
}

fn display_id(id: &Option<i64>) -> String {
    id.map(|i| i.to_string())
        .unwrap_or_else(|| "without id".to_string())
}

/// Error during export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Not managed group in export: {key:?}")]
    UnmanagedGroup { key: String },
    #[error("Nothing to export: no records given")]
    EmptyInput,
    #[error("Record {index} has no mandate key")]
    MissingMandate { index: usize },
    #[error("Record {index} belongs to {found}, expected {expected}")]
    MixedRecords {
        index: usize,
        expected: String,
        found: String,
    },
    #[error(transparent)]
    Row(#[from] RowError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ExportError {
    /// Whether the caller sent a request that can never succeed as-is
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            ExportError::UnmanagedGroup { .. }
                | ExportError::EmptyInput
                | ExportError::MissingMandate { .. }
                | ExportError::MixedRecords { .. }
        )
    }
}

// Re-export for convenience
pub use exporter::PdaExporter;
pub use renderer::RowRenderer;
pub use resolver::{BankAccountResolver, FnResolver, ResolveError, StoredIbanResolver};
pub use schema::{Cell, ColumnSchema, ColumnSpec, SchemaRegistry, SchemaVariant};
