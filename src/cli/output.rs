//! Output formatting for CLI

use crate::export::{ColumnSchema, ExportResult};

/// One-line summary of an export, with one extra line per skipped row
pub fn format_summary(result: &ExportResult) -> String {
    let mut output = format!(
        "Exported {} row(s) for {}/{}",
        result.rows, result.mandate, result.variant
    );

    if result.skipped.is_empty() {
        output.push('\n');
        return output;
    }

    output.push_str(&format!(", skipped {}:\n", result.skipped.len()));
    for err in &result.skipped {
        output.push_str(&format!("  - {} ({})\n", err, err.source));
    }
    output
}

/// Registered schemas with their column counts
pub fn format_schema_list(schemas: &[ColumnSchema]) -> String {
    let mut output = String::new();
    for schema in schemas {
        output.push_str(&format!(
            "{:<14} {:<12} {} columns\n",
            schema.mandate.key(),
            schema.variant.to_string(),
            schema.len()
        ));
    }
    output
}
