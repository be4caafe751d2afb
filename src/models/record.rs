//! Contract application record and its nested entities
//!
//! Records are produced by the retrieval layer and consumed read-only by the
//! exporter. Every nested entity is optional; the renderer treats a missing
//! entity exactly like a missing field.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::enums::LineActivation;

/// A contract application ("PDA") as handed over for export
///
/// # Example
///
/// ```rust
/// use pda_export::models::{ExportRecord, Group};
///
/// let record = ExportRecord {
///     id: Some(42),
///     group: Some(Group::new("fastweb")),
///     ..Default::default()
/// };
/// assert_eq!(record.mandate_key(), Some("fastweb"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportRecord {
    /// Record identifier
    pub id: Option<i64>,
    /// Mandate (commercial partner) the record belongs to
    pub group: Option<Group>,
    /// Contract sub-type classification
    pub contract_type: Option<ContractType>,
    /// Account code assigned to the contract
    pub code_account: Option<String>,
    /// Sales agent owning the record
    pub owner: Option<Owner>,
    /// Point of delivery code (energy supplies)
    pub pod: Option<String>,
    /// Energy contract kind, free text
    pub energy_pda_type: Option<String>,
    /// Enum-like offer kind code, e.g. `SOLO_FISSO`
    pub pda_type: Option<String>,
    /// Whether the voice line is new or ported
    pub line_activation: Option<LineActivation>,
    /// Landline number (voice line)
    pub landline_number: Option<String>,
    /// Migration code of the voice line
    pub voice_migration_code: Option<String>,
    /// Previous operator of the voice line
    pub voice_previous_operator: Option<String>,
    /// Migration code of the data line
    pub data_migration_code: Option<String>,
    /// Previous operator of the data line
    pub data_previous_operator: Option<String>,
    /// Creation timestamp
    pub created_at: Option<DateTime<Utc>>,
    pub customer: Option<Customer>,
    pub customer_document: Option<Document>,
    /// Activation/supply address
    pub supply_address: Option<Address>,
    pub shipping_address: Option<Address>,
    pub offer: Option<Offer>,
    pub payment: Option<Payment>,
    pub back_office: Option<BackOffice>,
}

impl ExportRecord {
    /// Mandate key of the record's group, if any
    pub fn mandate_key(&self) -> Option<&str> {
        self.group.as_ref().and_then(|g| g.group_key.as_deref())
    }

    /// Contract type id, if any
    pub fn type_id(&self) -> Option<i64> {
        self.contract_type.as_ref().and_then(|t| t.id)
    }
}

/// Mandate grouping of a record
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Group {
    pub group_key: Option<String>,
}

impl Group {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            group_key: Some(key.into()),
        }
    }
}

/// Contract sub-type (type discriminator plus display name)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContractType {
    pub id: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Owner {
    pub screen_name: Option<String>,
}

/// Customer identity, contacts and residence
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Customer {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub legal_form: Option<String>,
    pub tax_code: Option<String>,
    pub vat_number: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub birth_country: Option<String>,
    pub birth_city: Option<String>,
    pub birth_province: Option<String>,
    /// Primary mobile number as captured at signing
    pub mobile: Option<String>,
    /// Mobile number used for contact
    pub contact_mobile: Option<String>,
    /// Landline number used for contact
    pub contact_phone: Option<String>,
    pub email: Option<String>,
    pub pec_email: Option<String>,
    /// Whether the contract was signed by a delegate
    pub delegated: Option<bool>,
    /// Residence address
    pub address: Option<Address>,
}

/// Identity document attached to the customer
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Document {
    pub document_type: Option<DocumentType>,
    pub number: Option<String>,
    pub issuing_authority: Option<IssuingAuthority>,
    pub release_date: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub citizenship: Option<String>,
    pub release_city: Option<String>,
    pub release_province: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DocumentType {
    /// Short name (e.g. "CI")
    pub name: Option<String>,
    /// Long description (e.g. "Carta d'identità")
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IssuingAuthority {
    pub name: Option<String>,
}

/// Postal address, used for residence, supply and shipping
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Address {
    pub toponym: Option<Toponym>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub staircase: Option<String>,
    pub floor: Option<String>,
    pub unit: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
}

/// Street-type descriptor ("Via", "Piazza", ...)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Toponym {
    pub name: Option<String>,
}

impl Toponym {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Commercial offer
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Offer {
    pub name: Option<String>,
}

/// Payment method and bank details
///
/// `iban` holds the stored bank account identifier, which may be encrypted;
/// the exporter never reads it directly and goes through a
/// [`BankAccountResolver`](crate::export::BankAccountResolver).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Payment {
    pub payment_type: Option<String>,
    pub iban: Option<String>,
    /// Bank customer type code: null or 0 for a private person, otherwise a company
    pub bank_customer_type: Option<i64>,
}

/// Back-office data
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackOffice {
    pub account: Option<String>,
}
