//! Telecom mandate layouts
//!
//! Both variants share every column except the labels of the first voice-line
//! block: singular labels for single-line offers, `" 1"`-suffixed labels for
//! dual-line offers. Values and positions are the same.

use super::formatters::{
    country_or, date, enum_label, flag, holder_kind, local_date, number, street_line,
    text, upper,
};
use super::schema::{ColumnSchema, ColumnSpec, SchemaVariant};
use crate::config::ExportConfig;
use crate::models::{Address, Customer, Document, ExportRecord, Mandate};

const SINGLE_LINE_VOICE_LABELS: [&str; 5] = [
    "NP",
    "Numero Telefonico",
    "Codice Migrazione",
    "Operatore Provenienza Fisso",
    "Tipo Linea",
];

const DUAL_LINE_VOICE_LABELS: [&str; 5] = [
    "NP 1",
    "Numero Telefonico 1",
    "Codice Migrazione 1",
    "Operatore Provenienza Fisso 1",
    "Tipo Linea 1",
];

/// Delegate columns, never filled by this export
const DELEGATE_COLUMNS: [&str; 17] = [
    "Nome Delegato",
    "Cognome Delegato",
    "Sesso Delegato",
    "Data Nascita Delegato",
    "Nazione Nascita Delegato",
    "Città Nascita Delegato",
    "Provincia Nascita Delegato",
    "Codice Fiscale Delegato",
    "Numero Mobile Delegato",
    "Email Delegato",
    "Tipo Documento Riconoscimento Delegato",
    "Numero Documento Riconoscimento Delegato",
    "Emittente Documento Riconoscimento Delegato",
    "Data Documento Riconoscimento Delegato",
    "Nazionalità Documento Riconoscimento Delegato",
    "Città Documento Riconoscimento Delegato",
    "Provincia Documento Riconoscimento Delegato",
];

/// Offer options, second line and mobile lines, never filled by this export
const LINE_OPTION_COLUMNS: [&str; 29] = [
    "Partnership",
    "Sconto 1",
    "Opzione Fisso 1",
    "Opzione Fisso 2",
    "Opzione Fisso 3",
    "Seconda linea presente",
    "NP 2",
    "Numero Telefonico 2",
    "Codice Migrazione 2",
    "Operatore Provenienza Fisso 2",
    "Tipo Linea 2",
    "MNP 1",
    "Numero Sim 1",
    "ICCID Mobile 1",
    "Operatore Provenienza Mobile 1",
    "Tipo Contratto Mobile 1",
    "Trasferimento Credito Mobile 1",
    "MNP 2",
    "Numero Sim 2",
    "ICCID Mobile 2",
    "Operatore Provenienza Mobile 2",
    "Tipo Contratto Mobile 2",
    "Trasferimento Credito Mobile 2",
    "MNP 3",
    "Numero Sim 3",
    "ICCID Mobile 3",
    "Operatore Provenienza Mobile 3",
    "Tipo Contratto Mobile 3",
    "Trasferimento Credito Mobile 3",
];

/// Card payment columns, never filled by this export
const CARD_COLUMNS: [&str; 6] = [
    "Shop ID",
    "Payment ID",
    "Circuito Carta",
    "Numero Carta",
    "Scadenza Carta",
    "Token Carta",
];

fn customer(r: &ExportRecord) -> Option<&Customer> {
    r.customer.as_ref()
}

fn residence(r: &ExportRecord) -> Option<&Address> {
    customer(r).and_then(|c| c.address.as_ref())
}

fn document(r: &ExportRecord) -> Option<&Document> {
    r.customer_document.as_ref()
}

fn supply(r: &ExportRecord) -> Option<&Address> {
    r.supply_address.as_ref()
}

fn shipping(r: &ExportRecord) -> Option<&Address> {
    r.shipping_address.as_ref()
}

fn address_street(address: Option<&Address>) -> String {
    let Some(address) = address else {
        return String::new();
    };
    street_line(
        address.toponym.as_ref().and_then(|t| t.name.as_deref()),
        address.street.as_deref(),
    )
}

fn address_city(address: Option<&Address>) -> String {
    upper(address.and_then(|a| a.city.as_deref()))
}

fn address_province(address: Option<&Address>) -> String {
    upper(address.and_then(|a| a.province.as_deref()))
}

fn address_number(address: Option<&Address>) -> String {
    text(address.and_then(|a| a.number.as_deref()))
}

fn address_postal_code(address: Option<&Address>) -> String {
    text(address.and_then(|a| a.postal_code.as_deref()))
}

/// Floor of the supply address; a present address without floor is on the ground floor
fn supply_floor(address: Option<&Address>, config: &ExportConfig) -> String {
    match address {
        Some(a) => a.floor.clone().unwrap_or_else(|| config.default_floor.clone()),
        None => String::new(),
    }
}

/// Creation timestamp in the configured civil calendar
fn creation_date(r: &ExportRecord, config: &ExportConfig) -> String {
    local_date(r.created_at, config.timezone, &config.date_format)
}

fn voice_block(labels: [&'static str; 5]) -> [ColumnSpec; 5] {
    let [portability, number, migration, operator, line_type] = labels;
    [
        ColumnSpec::field(portability, |r, _| {
            flag(r.line_activation.map(|a| a.is_portability()))
        }),
        ColumnSpec::field(number, |r, _| text(r.landline_number.as_deref())),
        ColumnSpec::field(migration, |r, _| text(r.voice_migration_code.as_deref())),
        ColumnSpec::field(operator, |r, _| text(r.voice_previous_operator.as_deref())),
        ColumnSpec::empty(line_type),
    ]
}

/// 128 columns: 63 leading, 5 voice-line, 60 trailing
pub fn schema(variant: SchemaVariant) -> ColumnSchema {
    let voice_labels = match variant {
        SchemaVariant::SingleLine => SINGLE_LINE_VOICE_LABELS,
        _ => DUAL_LINE_VOICE_LABELS,
    };

    let mut columns = vec![
        ColumnSpec::empty("ID Firma Elettronica"),
        ColumnSpec::empty("Envelope ID"),
        ColumnSpec::empty("Tipo Invio"),
        ColumnSpec::field("Tipo Offerta", |r, _| enum_label(r.pda_type.as_deref())),
        ColumnSpec::field("Offerta Fissa", |r, _| {
            text(r.offer.as_ref().and_then(|o| o.name.as_deref()))
        }),
        ColumnSpec::empty("Offerta Mobile 1"),
        ColumnSpec::empty("Offerta Mobile 2"),
        ColumnSpec::field("Ragione Sociale", |r, _| {
            text(customer(r).and_then(|c| c.company_name.as_deref()))
        }),
        ColumnSpec::field("Forma Giuridica", |r, _| {
            text(customer(r).and_then(|c| c.legal_form.as_deref()))
        }),
        ColumnSpec::field("Partita Iva", |r, _| {
            text(customer(r).and_then(|c| c.vat_number.as_deref()))
        }),
        ColumnSpec::field("Account", |r, _| {
            text(r.back_office.as_ref().and_then(|b| b.account.as_deref()))
        }),
        ColumnSpec::field("Nome", |r, _| {
            text(customer(r).and_then(|c| c.first_name.as_deref()))
        }),
        ColumnSpec::field("Cognome", |r, _| {
            text(customer(r).and_then(|c| c.last_name.as_deref()))
        }),
        ColumnSpec::field("Sesso", |r, _| {
            text(customer(r).and_then(|c| c.gender.as_deref()))
        }),
        ColumnSpec::field("Data Nascita", |r, cfg| {
            date(customer(r).and_then(|c| c.birth_date), &cfg.date_format)
        }),
        ColumnSpec::field("Nazione Nascita", |r, cfg| {
            country_or(
                customer(r).and_then(|c| c.birth_country.as_deref()),
                &cfg.default_country,
            )
        }),
        ColumnSpec::field("Città Nascita", |r, _| {
            upper(customer(r).and_then(|c| c.birth_city.as_deref()))
        }),
        ColumnSpec::field("Provincia Nascita", |r, _| {
            upper(customer(r).and_then(|c| c.birth_province.as_deref()))
        }),
        ColumnSpec::field("Codice Fiscale", |r, _| {
            text(customer(r).and_then(|c| c.tax_code.as_deref()))
        }),
        ColumnSpec::field("Numero Mobile", |r, _| {
            text(customer(r).and_then(|c| c.contact_mobile.as_deref()))
        }),
        ColumnSpec::field("Numero Fisso", |r, _| {
            text(customer(r).and_then(|c| c.contact_phone.as_deref()))
        }),
        ColumnSpec::field("Email", |r, _| {
            text(customer(r).and_then(|c| c.email.as_deref()))
        }),
        ColumnSpec::field("Tipo Documento Riconoscimento", |r, _| {
            text(
                document(r)
                    .and_then(|d| d.document_type.as_ref())
                    .and_then(|t| t.name.as_deref()),
            )
        }),
        ColumnSpec::field("Numero Documento Riconoscimento", |r, _| {
            text(document(r).and_then(|d| d.number.as_deref()))
        }),
        ColumnSpec::field("Emittente Documento Riconoscimento", |r, _| {
            text(
                document(r)
                    .and_then(|d| d.issuing_authority.as_ref())
                    .and_then(|a| a.name.as_deref()),
            )
        }),
        ColumnSpec::field("Data Rilascio Documento Riconoscimento", |r, cfg| {
            date(document(r).and_then(|d| d.release_date), &cfg.date_format)
        }),
        ColumnSpec::field("Nazionalità Rilascio Documento Riconoscimento", |r, cfg| {
            country_or(
                document(r).and_then(|d| d.nationality.as_deref()),
                &cfg.default_country,
            )
        }),
        ColumnSpec::field("Cittadinanza Documento Riconoscimento", |r, _| {
            text(document(r).and_then(|d| d.citizenship.as_deref()))
        }),
        ColumnSpec::field("Città Rilascio Documento Riconoscimento", |r, _| {
            upper(document(r).and_then(|d| d.release_city.as_deref()))
        }),
        ColumnSpec::field("Provincia Rilascio Documento Riconoscimento", |r, _| {
            upper(document(r).and_then(|d| d.release_province.as_deref()))
        }),
        ColumnSpec::field("Città Residenza", |r, _| address_city(residence(r))),
        ColumnSpec::field("Provincia Residenza", |r, _| address_province(residence(r))),
        ColumnSpec::field("Indirizzo Residenza", |r, _| address_street(residence(r))),
        ColumnSpec::field("Civico Residenza", |r, _| address_number(residence(r))),
        ColumnSpec::field("CAP Residenza", |r, _| address_postal_code(residence(r))),
        ColumnSpec::field("Delegato", |r, _| flag(customer(r).and_then(|c| c.delegated))),
    ];

    columns.extend(DELEGATE_COLUMNS.into_iter().map(ColumnSpec::empty));

    columns.extend([
        ColumnSpec::field("Città Attivazione", |r, _| address_city(supply(r))),
        ColumnSpec::field("Provincia Attivazione", |r, _| address_province(supply(r))),
        ColumnSpec::field("Indirizzo Attivazione", |r, _| address_street(supply(r))),
        ColumnSpec::field("Civico Attivazione", |r, _| address_number(supply(r))),
        ColumnSpec::field("CAP Attivazione", |r, _| address_postal_code(supply(r))),
        ColumnSpec::field("Scala Attivazione", |r, _| {
            text(supply(r).and_then(|a| a.staircase.as_deref()))
        }),
        ColumnSpec::field("Piano Attivazione", |r, cfg| supply_floor(supply(r), cfg)),
        ColumnSpec::field("Interno Attivazione", |r, _| {
            text(supply(r).and_then(|a| a.unit.as_deref()))
        }),
        ColumnSpec::empty("Tecnologia Attivazione"),
        ColumnSpec::empty("Scelta Modem"),
    ]);

    columns.extend(voice_block(voice_labels));

    columns.extend([
        ColumnSpec::field("NP Dati", |r, _| {
            flag(r.data_migration_code.as_deref().map(|code| !code.is_empty()))
        }),
        ColumnSpec::field("Codice Migrazione Dati", |r, _| {
            text(r.data_migration_code.as_deref())
        }),
        ColumnSpec::field("Operatore Provenienza Dati", |r, _| {
            text(r.data_previous_operator.as_deref())
        }),
        ColumnSpec::field("Segmento", |r, _| {
            text(r.contract_type.as_ref().and_then(|t| t.name.as_deref()))
        }),
    ]);

    columns.extend(LINE_OPTION_COLUMNS.into_iter().map(ColumnSpec::empty));

    columns.extend([
        ColumnSpec::field("Tipo Pagamento", |r, _| {
            text(r.payment.as_ref().and_then(|p| p.payment_type.as_deref()))
        }),
        ColumnSpec::bank_account("IBAN"),
        ColumnSpec::field("Intestato a", |r, _| {
            holder_kind(r.payment.as_ref().and_then(|p| p.bank_customer_type)).to_string()
        }),
    ]);

    columns.extend(CARD_COLUMNS.into_iter().map(ColumnSpec::empty));

    columns.extend([
        ColumnSpec::field("Città Spedizione", |r, _| address_city(shipping(r))),
        ColumnSpec::field("Provincia Spedizione", |r, _| address_province(shipping(r))),
        ColumnSpec::field("Indirizzo Spedizione", |r, _| address_street(shipping(r))),
        ColumnSpec::field("Civico Spedizione", |r, _| address_number(shipping(r))),
        ColumnSpec::field("CAP Spedizione", |r, _| address_postal_code(shipping(r))),
        ColumnSpec::empty("Spedizione Presso"),
        ColumnSpec::empty("Utente Creazione"),
        ColumnSpec::empty("Comsy Creazione"),
        ColumnSpec::empty("Ragione Sociale Comsy Creazione"),
        ColumnSpec::empty("Canale Comsy Creazione"),
        ColumnSpec::field("Data Creazione", creation_date),
        ColumnSpec::field("Data Firma", creation_date),
        ColumnSpec::empty("Stato Inserimento CPQ"),
        ColumnSpec::empty("Data Inserimento CPQ"),
        ColumnSpec::field("Data Modifica", creation_date),
        ColumnSpec::empty("Data Scadenza"),
        ColumnSpec::empty("Data Invio SMS"),
        ColumnSpec::field("ID PDA", |r, _| number(r.id)),
    ]);

    ColumnSchema::new(Mandate::Fastweb, variant, columns)
}
