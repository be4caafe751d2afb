//! Row rendering
//!
//! Runs every column of a schema against one record. Only the bank account
//! column can fail; every other column is total over missing data.

use tracing::debug;

use super::resolver::{BankAccountResolver, ResolveError};
use super::schema::{Cell, ColumnSchema};
use super::{CellError, DELIMITER};
use crate::config::ExportConfig;
use crate::models::ExportRecord;

/// Renders records against a schema
pub struct RowRenderer<'a> {
    config: &'a ExportConfig,
    resolver: &'a dyn BankAccountResolver,
}

impl<'a> RowRenderer<'a> {
    pub fn new(config: &'a ExportConfig, resolver: &'a dyn BankAccountResolver) -> Self {
        Self { config, resolver }
    }

    /// Render one record into one string per schema column, in schema order
    pub fn render(
        &self,
        record: &ExportRecord,
        schema: &ColumnSchema,
    ) -> Result<Vec<String>, CellError> {
        let mut cells = Vec::with_capacity(schema.len());

        for column in &schema.columns {
            let value = match column.cell {
                Cell::Empty => String::new(),
                Cell::Fixed(value) => value.to_string(),
                Cell::Field(f) => f(record, self.config),
                Cell::BankAccount => {
                    self.bank_account(record)
                        .map_err(|source| CellError {
                            column: column.name,
                            source,
                        })?
                }
            };

            if value.contains(DELIMITER) || value.contains('\n') {
                debug!(
                    record_id = ?record.id,
                    column = column.name,
                    "Cell contains the delimiter or a newline; output will be ambiguous"
                );
            }

            cells.push(value);
        }

        Ok(cells)
    }

    /// No payment entity means no lookup and an empty cell
    fn bank_account(&self, record: &ExportRecord) -> Result<String, ResolveError> {
        match &record.payment {
            Some(payment) => self.resolver.resolve(payment),
            None => Ok(String::new()),
        }
    }
}
