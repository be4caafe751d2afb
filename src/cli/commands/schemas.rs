//! Schema inspection commands

use crate::cli::error::CliError;
use crate::cli::output::format_schema_list;
use crate::export::{PdaExporter, StoredIbanResolver};

/// Handle the `header` command
pub fn handle_header(mandate: &str, type_id: i64) -> Result<(), CliError> {
    let exporter = PdaExporter::new(StoredIbanResolver);
    println!("{}", exporter.header(mandate, type_id)?);
    Ok(())
}

/// Handle the `schemas` command
pub fn handle_schemas() -> Result<(), CliError> {
    let exporter = PdaExporter::new(StoredIbanResolver);
    print!("{}", format_schema_list(exporter.registry().schemas()));
    Ok(())
}
