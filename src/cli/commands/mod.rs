//! CLI command handlers

pub mod export;
pub mod schemas;

pub use export::{ExportArgs, InputFormat, handle_export, load_records};
pub use schemas::{handle_header, handle_schemas};
