//! Column schemas and the schema registry
//!
//! A schema is an ordered list of columns. Each column carries the header
//! label and a [`Cell`] describing how its value is obtained from a record.
//! Header and body rows are both derived from the same list, so their column
//! counts cannot drift apart.

use std::fmt;

use tracing::debug;

use super::ExportError;
use super::{energy, telecom};
use crate::config::ExportConfig;
use crate::models::{ExportRecord, Mandate};

/// Extraction + formatting step of a single column
pub type FieldFn = fn(&ExportRecord, &ExportConfig) -> String;

/// How a column's value is produced
#[derive(Debug, Clone, Copy)]
pub enum Cell {
    /// Always empty (column reserved for the downstream consumer)
    Empty,
    /// Literal value
    Fixed(&'static str),
    /// Pure function of the record
    Field(FieldFn),
    /// Bank account identifier, obtained through the external resolver
    BankAccount,
}

/// One column of a schema
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    /// Header label
    pub name: &'static str,
    pub cell: Cell,
}

impl ColumnSpec {
    pub const fn new(name: &'static str, cell: Cell) -> Self {
        Self { name, cell }
    }

    /// Column rendered from the record
    pub const fn field(name: &'static str, f: FieldFn) -> Self {
        Self::new(name, Cell::Field(f))
    }

    /// Column always left empty
    pub const fn empty(name: &'static str) -> Self {
        Self::new(name, Cell::Empty)
    }

    /// Column holding a literal
    pub const fn fixed(name: &'static str, value: &'static str) -> Self {
        Self::new(name, Cell::Fixed(value))
    }

    /// Column holding the resolved bank account identifier
    pub const fn bank_account(name: &'static str) -> Self {
        Self::new(name, Cell::BankAccount)
    }
}

/// Layout variant within a mandate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVariant {
    /// The mandate has a single layout
    Standard,
    /// Telecom offer with a single voice line (type 1)
    SingleLine,
    /// Telecom offer with two voice lines
    DualLine,
}

impl SchemaVariant {
    /// Variant used by `mandate` for contract type `type_id`
    pub fn for_type(mandate: Mandate, type_id: i64) -> Self {
        match mandate {
            Mandate::EnelEnergia => SchemaVariant::Standard,
            Mandate::Fastweb if type_id == 1 => SchemaVariant::SingleLine,
            Mandate::Fastweb => SchemaVariant::DualLine,
        }
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaVariant::Standard => write!(f, "standard"),
            SchemaVariant::SingleLine => write!(f, "single-line"),
            SchemaVariant::DualLine => write!(f, "dual-line"),
        }
    }
}

/// Ordered columns for one (mandate, variant)
#[derive(Debug, Clone)]
pub struct ColumnSchema {
    pub mandate: Mandate,
    pub variant: SchemaVariant,
    pub columns: Vec<ColumnSpec>,
}

impl ColumnSchema {
    pub fn new(mandate: Mandate, variant: SchemaVariant, columns: Vec<ColumnSpec>) -> Self {
        Self {
            mandate,
            variant,
            columns,
        }
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Header labels in column order
    pub fn header(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// Position of the column labelled `name`
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

/// Read-only lookup of column schemas by mandate key and contract type
///
/// # Example
///
/// ```rust
/// use pda_export::export::{SchemaRegistry, SchemaVariant};
///
/// let registry = SchemaRegistry::new();
/// let schema = registry.resolve("FASTWEB", 1).unwrap();
/// assert_eq!(schema.variant, SchemaVariant::SingleLine);
/// assert_eq!(schema.header()[63], "NP");
/// ```
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: Vec<ColumnSchema>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaRegistry {
    /// Build the registry with every supported schema
    pub fn new() -> Self {
        Self {
            schemas: vec![
                energy::schema(),
                telecom::schema(SchemaVariant::SingleLine),
                telecom::schema(SchemaVariant::DualLine),
            ],
        }
    }

    /// All registered schemas
    pub fn schemas(&self) -> &[ColumnSchema] {
        &self.schemas
    }

    /// Schema registered for a mandate and variant
    pub fn get(&self, mandate: Mandate, variant: SchemaVariant) -> Option<&ColumnSchema> {
        self.schemas
            .iter()
            .find(|s| s.mandate == mandate && s.variant == variant)
    }

    /// Resolve the schema for a mandate key (case-insensitive) and contract type
    ///
    /// # Errors
    ///
    /// [`ExportError::UnmanagedGroup`] when the key names no supported mandate.
    pub fn resolve(&self, mandate_key: &str, type_id: i64) -> Result<&ColumnSchema, ExportError> {
        let mandate: Mandate = mandate_key
            .parse()
            .map_err(|key| ExportError::UnmanagedGroup { key })?;
        let variant = SchemaVariant::for_type(mandate, type_id);
        debug!(%mandate, %variant, type_id, "Resolved export schema");

        self.get(mandate, variant)
            .ok_or_else(|| ExportError::UnmanagedGroup {
                key: mandate_key.to_string(),
            })
    }
}
