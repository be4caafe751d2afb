//! Energy mandate layout

use super::formatters::{date, text};
use super::schema::{ColumnSchema, ColumnSpec, SchemaVariant};
use crate::models::{Address, Customer, Document, ExportRecord, Mandate};

fn customer(r: &ExportRecord) -> Option<&Customer> {
    r.customer.as_ref()
}

fn document(r: &ExportRecord) -> Option<&Document> {
    r.customer_document.as_ref()
}

fn supply(r: &ExportRecord) -> Option<&Address> {
    r.supply_address.as_ref()
}

/// 31 columns, identical for every contract type
pub fn schema() -> ColumnSchema {
    let columns = vec![
        ColumnSpec::field("segmento", |r, _| {
            text(r.contract_type.as_ref().and_then(|t| t.name.as_deref()))
        }),
        ColumnSpec::field("formaGiuridica", |r, _| {
            text(customer(r).and_then(|c| c.legal_form.as_deref()))
        }),
        ColumnSpec::field("numeroContrattoPreferica", |r, _| text(r.code_account.as_deref())),
        ColumnSpec::field("nomePreverifica", |r, _| {
            text(customer(r).and_then(|c| c.first_name.as_deref()))
        }),
        ColumnSpec::field("cognomePreverifica", |r, _| {
            text(customer(r).and_then(|c| c.last_name.as_deref()))
        }),
        ColumnSpec::field("cfPreverifica", |r, _| {
            text(customer(r).and_then(|c| c.tax_code.as_deref()))
        }),
        ColumnSpec::field("piPreverifica", |r, _| {
            text(customer(r).and_then(|c| c.vat_number.as_deref()))
        }),
        ColumnSpec::empty("dataFirmaInfoContratto"),
        ColumnSpec::empty("codiceIncaricatoInfoContratto"),
        ColumnSpec::field("owner", |r, _| {
            text(r.owner.as_ref().and_then(|o| o.screen_name.as_deref()))
        }),
        ColumnSpec::field("podForniture", |r, _| text(r.pod.as_deref())),
        ColumnSpec::field("tipoPdaEnergia", |r, _| text(r.energy_pda_type.as_deref())),
        ColumnSpec::field("capForniture", |r, _| {
            text(supply(r).and_then(|a| a.postal_code.as_deref()))
        }),
        ColumnSpec::field("localitaForniture", |r, _| {
            text(supply(r).and_then(|a| a.city.as_deref()))
        }),
        ColumnSpec::field("tipodocumentoAnagraficaRes", |r, _| {
            text(
                document(r)
                    .and_then(|d| d.document_type.as_ref())
                    .and_then(|t| t.description.as_deref()),
            )
        }),
        ColumnSpec::field("numerodocumentoAnagraficaRes", |r, _| {
            text(document(r).and_then(|d| d.number.as_deref()))
        }),
        ColumnSpec::field("rilasciatodaAnagraficaRes", |r, _| {
            text(
                document(r)
                    .and_then(|d| d.issuing_authority.as_ref())
                    .and_then(|a| a.name.as_deref()),
            )
        }),
        ColumnSpec::field("rilasciatoilAnagraficaRes", |r, cfg| {
            date(document(r).and_then(|d| d.release_date), &cfg.date_format)
        }),
        ColumnSpec::field("telefonofissoAnagraficaRes", |r, _| {
            text(r.landline_number.as_deref())
        }),
        ColumnSpec::field("cellulareAnagraficaRes", |r, _| {
            text(customer(r).and_then(|c| c.mobile.as_deref()))
        }),
        ColumnSpec::field("emailAnagraficaRes", |r, _| {
            text(customer(r).and_then(|c| c.email.as_deref()))
        }),
        ColumnSpec::field("pecAnagraficaRes", |r, _| {
            text(customer(r).and_then(|c| c.pec_email.as_deref()))
        }),
        ColumnSpec::field("toponomasticaAddress", |r, _| {
            text(
                supply(r)
                    .and_then(|a| a.toponym.as_ref())
                    .and_then(|t| t.name.as_deref()),
            )
        }),
        ColumnSpec::field("indrizzoAddress", |r, _| {
            text(supply(r).and_then(|a| a.street.as_deref()))
        }),
        ColumnSpec::field("civicoAddress", |r, _| {
            text(supply(r).and_then(|a| a.number.as_deref()))
        }),
        ColumnSpec::field("scalaAddress", |r, _| {
            text(supply(r).and_then(|a| a.staircase.as_deref()))
        }),
        ColumnSpec::field("pianoCivicoAddress", |r, _| {
            text(supply(r).and_then(|a| a.floor.as_deref()))
        }),
        ColumnSpec::field("internoAddress", |r, _| {
            text(supply(r).and_then(|a| a.unit.as_deref()))
        }),
        ColumnSpec::field("capAddress", |r, _| {
            text(supply(r).and_then(|a| a.postal_code.as_deref()))
        }),
        ColumnSpec::field("comuneAddress", |r, _| {
            text(supply(r).and_then(|a| a.city.as_deref()))
        }),
        // The downstream layout takes the province from the shipping address
        ColumnSpec::field("provinciaAddress", |r, _| {
            text(
                r.shipping_address
                    .as_ref()
                    .and_then(|a| a.province.as_deref()),
            )
        }),
    ];

    ColumnSchema::new(Mandate::EnelEnergia, SchemaVariant::Standard, columns)
}
