//! Semicolon-delimited exporter for contract applications
//!
//! Resolves the schema from the first record, checks the rest of the batch
//! belongs to the same schema, renders a header line and one line per record
//! in input order.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{error, info, info_span, warn};

use super::renderer::RowRenderer;
use super::resolver::BankAccountResolver;
use super::schema::{ColumnSchema, SchemaRegistry, SchemaVariant};
use super::{DELIMITER, ExportError, ExportResult, LINE_SEPARATOR, RowError};
use crate::config::{ConfigError, ExportConfig, RowFailurePolicy};
use crate::models::{ExportRecord, Mandate};

/// Exporter for the semicolon-delimited PDA format
///
/// # Example
///
/// ```rust
/// use pda_export::export::{PdaExporter, StoredIbanResolver};
/// use pda_export::models::{ContractType, ExportRecord, Group};
///
/// let record = ExportRecord {
///     id: Some(1),
///     group: Some(Group::new("enel_energia")),
///     contract_type: Some(ContractType { id: Some(3), name: Some("Residenziale".into()) }),
///     ..Default::default()
/// };
///
/// let exporter = PdaExporter::new(StoredIbanResolver);
/// let result = exporter.export(&[record]).unwrap();
/// assert_eq!(result.rows, 1);
/// assert!(result.content.lines().nth(1).unwrap().starts_with("Residenziale;"));
/// ```
pub struct PdaExporter<R: BankAccountResolver> {
    registry: SchemaRegistry,
    config: ExportConfig,
    resolver: R,
}

impl<R: BankAccountResolver> PdaExporter<R> {
    /// Create an exporter with the default configuration
    pub fn new(resolver: R) -> Self {
        Self {
            registry: SchemaRegistry::new(),
            config: ExportConfig::default(),
            resolver,
        }
    }

    /// Create an exporter with a custom configuration
    pub fn with_config(resolver: R, config: ExportConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            registry: SchemaRegistry::new(),
            config,
            resolver,
        })
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Header line (without terminator) for a mandate key and contract type
    pub fn header(&self, mandate_key: &str, type_id: i64) -> Result<String, ExportError> {
        let schema = self.registry.resolve(mandate_key, type_id)?;
        Ok(join_line(schema.header()))
    }

    /// Export a batch of records sharing one mandate and contract type
    ///
    /// # Errors
    ///
    /// - [`ExportError::EmptyInput`] for an empty batch
    /// - [`ExportError::MissingMandate`] when the first record has no mandate key
    /// - [`ExportError::UnmanagedGroup`] for an unsupported mandate
    /// - [`ExportError::MixedRecords`] when homogeneity is required and violated
    /// - [`ExportError::Row`] when a row fails under [`RowFailurePolicy::Abort`]
    pub fn export(&self, records: &[ExportRecord]) -> Result<ExportResult, ExportError> {
        let first = records.first().ok_or(ExportError::EmptyInput)?;
        let mandate_key = first
            .mandate_key()
            .ok_or(ExportError::MissingMandate { index: 0 })?;
        let schema = self
            .registry
            .resolve(mandate_key, first.type_id().unwrap_or(0))?;

        let _span = info_span!(
            "pda_export",
            mandate = %schema.mandate,
            variant = %schema.variant,
            records = records.len()
        )
        .entered();

        self.check_homogeneity(records, schema)?;

        let renderer = RowRenderer::new(&self.config, &self.resolver);

        let mut content = join_line(schema.header());
        content.push(LINE_SEPARATOR);

        #[cfg(feature = "parallel")]
        let rendered = records
            .par_iter()
            .map(|record| renderer.render(record, schema))
            .collect::<Vec<_>>()
            .into_iter();
        #[cfg(not(feature = "parallel"))]
        let rendered = records.iter().map(|record| renderer.render(record, schema));

        let mut rows = 0;
        let mut skipped = Vec::new();

        for (index, (record, row)) in records.iter().zip(rendered).enumerate() {
            match row {
                Ok(cells) => {
                    debug_assert_eq!(cells.len(), schema.len());
                    content.push_str(&join_line(cells));
                    content.push(LINE_SEPARATOR);
                    rows += 1;
                }
                Err(cell) => {
                    let err = RowError::new(index, record, cell);
                    match self.config.row_failure_policy {
                        RowFailurePolicy::Abort => {
                            error!(
                                index,
                                record_id = ?err.record_id,
                                column = err.column,
                                error = %err.source,
                                "Row failed, aborting export"
                            );
                            return Err(ExportError::Row(err));
                        }
                        RowFailurePolicy::SkipRow => {
                            warn!(
                                index,
                                record_id = ?err.record_id,
                                column = err.column,
                                error = %err.source,
                                "Row failed, skipping"
                            );
                            skipped.push(err);
                        }
                    }
                }
            }
        }

        info!(rows, skipped = skipped.len(), "Export completed");

        Ok(ExportResult {
            content,
            format: "csv".to_string(),
            mandate: schema.mandate,
            variant: schema.variant,
            rows,
            skipped,
        })
    }

    /// Every record must map to the schema resolved from the first one
    fn check_homogeneity(
        &self,
        records: &[ExportRecord],
        schema: &ColumnSchema,
    ) -> Result<(), ExportError> {
        for (index, record) in records.iter().enumerate().skip(1) {
            let found = describe(record);
            let matches = record
                .mandate_key()
                .and_then(|key| key.parse::<Mandate>().ok())
                .map(|mandate| {
                    let variant = SchemaVariant::for_type(mandate, record.type_id().unwrap_or(0));
                    mandate == schema.mandate && variant == schema.variant
                })
                .unwrap_or(false);

            if matches {
                continue;
            }

            if self.config.require_homogeneous {
                return Err(ExportError::MixedRecords {
                    index,
                    expected: format!("{}/{}", schema.mandate, schema.variant),
                    found,
                });
            }

            warn!(
                index,
                record_id = ?record.id,
                found = %found,
                "Record does not match the export schema, rendering it anyway"
            );
        }
        Ok(())
    }
}

/// `mandate/variant` of a record, or its raw key when unsupported
fn describe(record: &ExportRecord) -> String {
    let Some(key) = record.mandate_key() else {
        return "no mandate".to_string();
    };
    match key.parse::<Mandate>() {
        Ok(mandate) => format!(
            "{}/{}",
            mandate,
            SchemaVariant::for_type(mandate, record.type_id().unwrap_or(0))
        ),
        Err(_) => format!("unmanaged group {:?}", key),
    }
}

fn join_line<S: AsRef<str>>(cells: Vec<S>) -> String {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push(DELIMITER);
        }
        line.push_str(cell.as_ref());
    }
    line
}
