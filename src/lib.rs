//! PDA Export - schema-per-mandate text export of contract applications
//!
//! Provides:
//! - Contract application models (records and nested entities)
//! - Export configuration
//! - Column schemas per mandate and contract type
//! - Row rendering and the semicolon-delimited exporter

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod export;
pub mod models;

// Re-export commonly used types
pub use config::{ConfigError, ExportConfig, RowFailurePolicy};
pub use export::{
    BankAccountResolver, ColumnSchema, ExportError, ExportResult, PdaExporter, ResolveError,
    RowError, SchemaRegistry, SchemaVariant, StoredIbanResolver,
};
pub use models::{ExportRecord, Mandate};
