//! Models module
//!
//! Defines the contract application record consumed by the exporter and the
//! enumerations used to pick a column schema.

pub mod enums;
pub mod record;

pub use enums::{LineActivation, Mandate};
pub use record::{
    Address, BackOffice, ContractType, Customer, Document, DocumentType, ExportRecord, Group,
    IssuingAuthority, Offer, Owner, Payment, Toponym,
};
