//! Export pipeline tests

use chrono::{NaiveDate, TimeZone, Utc};
use pda_export::config::{ConfigError, ExportConfig, RowFailurePolicy};
use pda_export::export::{
    BankAccountResolver, ExportError, FnResolver, PdaExporter, ResolveError, SchemaRegistry,
    SchemaVariant, StoredIbanResolver,
};
use pda_export::models::{
    Address, BackOffice, ContractType, Customer, Document, DocumentType, ExportRecord, Group,
    IssuingAuthority, LineActivation, Mandate, Offer, Owner, Payment, Toponym,
};
use std::sync::atomic::{AtomicUsize, Ordering};

fn address(toponym: &str, street: &str, city: &str, province: &str) -> Address {
    Address {
        toponym: Some(Toponym::new(toponym)),
        street: Some(street.to_string()),
        number: Some("12".to_string()),
        staircase: Some("B".to_string()),
        floor: Some("2".to_string()),
        unit: Some("4".to_string()),
        postal_code: Some("20121".to_string()),
        city: Some(city.to_string()),
        province: Some(province.to_string()),
    }
}

fn full_record(mandate: &str, type_id: i64, id: i64) -> ExportRecord {
    ExportRecord {
        id: Some(id),
        group: Some(Group::new(mandate)),
        contract_type: Some(ContractType {
            id: Some(type_id),
            name: Some("Residenziale".to_string()),
        }),
        code_account: Some("ACC-001".to_string()),
        owner: Some(Owner {
            screen_name: Some("agent.rossi".to_string()),
        }),
        pod: Some("IT001E12345678".to_string()),
        energy_pda_type: Some("Switch".to_string()),
        pda_type: Some("SOLO_FISSO".to_string()),
        line_activation: Some(LineActivation::NumberPortability),
        landline_number: Some("0212345678".to_string()),
        voice_migration_code: Some("TLC123".to_string()),
        voice_previous_operator: Some("Telecom".to_string()),
        data_migration_code: Some("DAT456".to_string()),
        data_previous_operator: Some("Vodafone".to_string()),
        created_at: Utc.with_ymd_and_hms(2024, 3, 4, 23, 30, 0).single(),
        customer: Some(Customer {
            first_name: Some("Mario".to_string()),
            last_name: Some("Rossi".to_string()),
            company_name: Some("Rossi SRL".to_string()),
            legal_form: Some("SRL".to_string()),
            tax_code: Some("RSSMRA80A01F205X".to_string()),
            vat_number: Some("01234567890".to_string()),
            gender: Some("M".to_string()),
            birth_date: NaiveDate::from_ymd_opt(1980, 1, 1),
            birth_country: Some("Italia".to_string()),
            birth_city: Some("Milano".to_string()),
            birth_province: Some("MI".to_string()),
            mobile: Some("3331234567".to_string()),
            contact_mobile: Some("3337654321".to_string()),
            contact_phone: Some("0287654321".to_string()),
            email: Some("mario.rossi@example.com".to_string()),
            pec_email: Some("mario.rossi@pec.example.com".to_string()),
            delegated: Some(false),
            address: Some(address("Via", "Roma", "Milano", "MI")),
        }),
        customer_document: Some(Document {
            document_type: Some(DocumentType {
                name: Some("CI".to_string()),
                description: Some("Carta di identita".to_string()),
            }),
            number: Some("AX1234567".to_string()),
            issuing_authority: Some(IssuingAuthority {
                name: Some("Comune".to_string()),
            }),
            release_date: NaiveDate::from_ymd_opt(2024, 3, 5),
            nationality: Some("Italiana".to_string()),
            citizenship: Some("Italiana".to_string()),
            release_city: Some("Milano".to_string()),
            release_province: Some("MI".to_string()),
        }),
        supply_address: Some(address("Piazza", "Duomo", "Milano", "MI")),
        shipping_address: Some(address("Corso", "Como", "Torino", "TO")),
        offer: Some(Offer {
            name: Some("Casa Light".to_string()),
        }),
        payment: Some(Payment {
            payment_type: Some("SDD".to_string()),
            iban: Some("IT60X0542811101000000123456".to_string()),
            bank_customer_type: Some(1),
        }),
        back_office: Some(BackOffice {
            account: Some("BO-99".to_string()),
        }),
    }
}

fn bare_record(mandate: &str, type_id: i64) -> ExportRecord {
    ExportRecord {
        group: Some(Group::new(mandate)),
        contract_type: Some(ContractType {
            id: Some(type_id),
            name: None,
        }),
        ..Default::default()
    }
}

/// Body line `n` (1-based, after the header) split into cells
fn body_cells(content: &str, n: usize) -> Vec<String> {
    content
        .lines()
        .nth(n)
        .expect("missing body line")
        .split(';')
        .map(str::to_string)
        .collect()
}

fn header_cells(content: &str) -> Vec<String> {
    body_cells(content, 0)
}

fn cell<'a>(header: &[String], row: &'a [String], name: &str) -> &'a str {
    let pos = header
        .iter()
        .position(|h| h == name)
        .unwrap_or_else(|| panic!("no column {}", name));
    &row[pos]
}

mod column_count_tests {
    use super::*;

    #[test]
    fn test_header_and_rows_agree_for_every_schema() {
        let registry = SchemaRegistry::new();
        let exporter = PdaExporter::new(StoredIbanResolver);

        for schema in registry.schemas() {
            let type_id = match schema.variant {
                SchemaVariant::SingleLine => 1,
                _ => 2,
            };
            let key = schema.mandate.key();
            let records = vec![
                full_record(key, type_id, 1),
                bare_record(key, type_id),
                full_record(key, type_id, 3),
            ];
            let result = exporter.export(&records).unwrap();

            assert_eq!(result.mandate, schema.mandate);
            assert_eq!(result.variant, schema.variant);
            assert_eq!(result.rows, 3);

            let widths: Vec<usize> = result
                .content
                .lines()
                .map(|line| line.split(';').count())
                .collect();
            assert_eq!(widths, vec![schema.len(); 4], "{}/{}", key, schema.variant);
        }
    }

    #[test]
    fn test_telecom_variants_same_width_different_voice_labels() {
        let registry = SchemaRegistry::new();
        let single = registry.resolve("fastweb", 1).unwrap();
        let dual = registry.resolve("fastweb", 2).unwrap();

        assert_eq!(single.len(), dual.len());
        let differing: Vec<(&str, &str)> = single
            .header()
            .into_iter()
            .zip(dual.header())
            .filter(|(a, b)| a != b)
            .collect();
        assert_eq!(
            differing,
            vec![
                ("NP", "NP 1"),
                ("Numero Telefonico", "Numero Telefonico 1"),
                ("Codice Migrazione", "Codice Migrazione 1"),
                ("Operatore Provenienza Fisso", "Operatore Provenienza Fisso 1"),
                ("Tipo Linea", "Tipo Linea 1"),
            ]
        );
    }

    #[test]
    fn test_telecom_variants_render_same_values() {
        let exporter = PdaExporter::new(StoredIbanResolver);
        let single = exporter.export(&[full_record("fastweb", 1, 8)]).unwrap();
        let dual = exporter.export(&[full_record("fastweb", 2, 8)]).unwrap();

        let single_row = body_cells(&single.content, 1);
        let dual_row = body_cells(&dual.content, 1);
        assert_eq!(single_row, dual_row);
        assert_eq!(single_row[63], "VERO");
        assert_eq!(single_row[64], "0212345678");
    }
}

mod energy_tests {
    use super::*;

    #[test]
    fn test_full_energy_record_end_to_end() {
        let exporter = PdaExporter::new(StoredIbanResolver);
        let result = exporter
            .export(&[full_record("ENEL_ENERGIA", 3, 11)])
            .unwrap();

        let header = header_cells(&result.content);
        let row = body_cells(&result.content, 1);
        assert_eq!(header.len(), 31);
        assert_eq!(row.len(), 31);

        assert_eq!(
            row,
            vec![
                "Residenziale",
                "SRL",
                "ACC-001",
                "Mario",
                "Rossi",
                "RSSMRA80A01F205X",
                "01234567890",
                "",
                "",
                "agent.rossi",
                "IT001E12345678",
                "Switch",
                "20121",
                "Milano",
                "Carta di identita",
                "AX1234567",
                "Comune",
                "05/03/2024",
                "0212345678",
                "3331234567",
                "mario.rossi@example.com",
                "mario.rossi@pec.example.com",
                "Piazza",
                "Duomo",
                "12",
                "B",
                "2",
                "4",
                "20121",
                "Milano",
                "TO",
            ]
        );
    }

    #[test]
    fn test_energy_ignores_contract_type_id() {
        let registry = SchemaRegistry::new();
        let a = registry.resolve("enel_energia", 1).unwrap();
        let b = registry.resolve("enel_energia", 2).unwrap();
        assert_eq!(a.header(), b.header());
    }
}

mod telecom_tests {
    use super::*;

    #[test]
    fn test_full_telecom_record_values() {
        let exporter = PdaExporter::new(StoredIbanResolver);
        let result = exporter.export(&[full_record("fastweb", 1, 42)]).unwrap();
        let header = header_cells(&result.content);
        let row = body_cells(&result.content, 1);

        assert_eq!(cell(&header, &row, "Tipo Offerta"), "Solo Fisso");
        assert_eq!(cell(&header, &row, "Offerta Fissa"), "Casa Light");
        assert_eq!(cell(&header, &row, "Account"), "BO-99");
        assert_eq!(cell(&header, &row, "Data Nascita"), "01/01/1980");
        assert_eq!(cell(&header, &row, "Nazione Nascita"), "ITALIA");
        assert_eq!(cell(&header, &row, "Città Nascita"), "MILANO");
        assert_eq!(cell(&header, &row, "Numero Mobile"), "3337654321");
        assert_eq!(cell(&header, &row, "Numero Fisso"), "0287654321");
        assert_eq!(cell(&header, &row, "Tipo Documento Riconoscimento"), "CI");
        assert_eq!(
            cell(&header, &row, "Nazionalità Rilascio Documento Riconoscimento"),
            "ITALIANA"
        );
        assert_eq!(
            cell(&header, &row, "Cittadinanza Documento Riconoscimento"),
            "Italiana"
        );
        assert_eq!(cell(&header, &row, "Indirizzo Residenza"), "VIA ROMA");
        assert_eq!(cell(&header, &row, "Città Residenza"), "MILANO");
        assert_eq!(cell(&header, &row, "Delegato"), "FALSO");
        assert_eq!(cell(&header, &row, "Indirizzo Attivazione"), "PIAZZA DUOMO");
        assert_eq!(cell(&header, &row, "Piano Attivazione"), "2");
        assert_eq!(cell(&header, &row, "NP"), "VERO");
        assert_eq!(cell(&header, &row, "Codice Migrazione"), "TLC123");
        assert_eq!(cell(&header, &row, "Operatore Provenienza Fisso"), "Telecom");
        assert_eq!(cell(&header, &row, "NP Dati"), "VERO");
        assert_eq!(cell(&header, &row, "Codice Migrazione Dati"), "DAT456");
        assert_eq!(cell(&header, &row, "Segmento"), "Residenziale");
        assert_eq!(cell(&header, &row, "Tipo Pagamento"), "SDD");
        assert_eq!(cell(&header, &row, "IBAN"), "IT60X0542811101000000123456");
        assert_eq!(cell(&header, &row, "Intestato a"), "PIVA");
        assert_eq!(cell(&header, &row, "Città Spedizione"), "TORINO");
        assert_eq!(cell(&header, &row, "Indirizzo Spedizione"), "CORSO COMO");
        assert_eq!(cell(&header, &row, "ID PDA"), "42");
    }

    #[test]
    fn test_creation_dates_use_rome_calendar() {
        let exporter = PdaExporter::new(StoredIbanResolver);
        let result = exporter.export(&[full_record("fastweb", 2, 1)]).unwrap();
        let header = header_cells(&result.content);
        let row = body_cells(&result.content, 1);

        // 2024-03-04T23:30Z is already the 5th in Rome
        for column in ["Data Creazione", "Data Firma", "Data Modifica"] {
            assert_eq!(cell(&header, &row, column), "05/03/2024");
        }
    }

    #[test]
    fn test_configured_timezone_and_pattern() {
        let config = ExportConfig::default()
            .with_timezone(chrono_tz::Tz::UTC)
            .with_date_format("%Y-%m-%d");
        let exporter = PdaExporter::with_config(StoredIbanResolver, config).unwrap();
        let result = exporter.export(&[full_record("fastweb", 2, 1)]).unwrap();
        let header = header_cells(&result.content);
        let row = body_cells(&result.content, 1);

        assert_eq!(cell(&header, &row, "Data Creazione"), "2024-03-04");
        assert_eq!(cell(&header, &row, "Data Nascita"), "1980-01-01");
    }

    #[test]
    fn test_time_fields_in_date_pattern_rejected_up_front() {
        let err = ExportConfig::from_toml_str("date_format = \"%d/%m/%Y %H:%M\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDateFormat(_)));

        let config = ExportConfig::default().with_date_format("%d/%m/%Y %H:%M");
        assert!(PdaExporter::with_config(StoredIbanResolver, config).is_err());
    }

    #[test]
    fn test_street_requires_both_parts() {
        let mut record = full_record("fastweb", 1, 1);
        if let Some(address) = record.supply_address.as_mut() {
            address.toponym = None;
        }
        let exporter = PdaExporter::new(StoredIbanResolver);
        let result = exporter.export(&[record]).unwrap();
        let header = header_cells(&result.content);
        let row = body_cells(&result.content, 1);

        assert_eq!(cell(&header, &row, "Indirizzo Attivazione"), "");
        assert_eq!(cell(&header, &row, "Città Attivazione"), "MILANO");
    }

    #[test]
    fn test_flag_encodings() {
        let mut record = full_record("fastweb", 1, 1);
        record.line_activation = Some(LineActivation::NewLine);
        record.data_migration_code = Some(String::new());
        if let Some(customer) = record.customer.as_mut() {
            customer.delegated = Some(true);
        }

        let exporter = PdaExporter::new(StoredIbanResolver);
        let result = exporter.export(&[record]).unwrap();
        let header = header_cells(&result.content);
        let row = body_cells(&result.content, 1);

        assert_eq!(cell(&header, &row, "NP"), "FALSO");
        assert_eq!(cell(&header, &row, "NP Dati"), "FALSO");
        assert_eq!(cell(&header, &row, "Delegato"), "VERO");
        assert!(!row.iter().any(|c| c == "true" || c == "false"));
    }

    #[test]
    fn test_country_fallback_and_holder_kind() {
        let mut record = full_record("fastweb", 1, 1);
        if let Some(customer) = record.customer.as_mut() {
            customer.birth_country = Some(String::new());
        }
        if let Some(payment) = record.payment.as_mut() {
            payment.bank_customer_type = Some(0);
        }

        let config = ExportConfig::default().with_default_country("San Marino");
        let exporter = PdaExporter::with_config(StoredIbanResolver, config).unwrap();
        let result = exporter.export(&[record]).unwrap();
        let header = header_cells(&result.content);
        let row = body_cells(&result.content, 1);

        assert_eq!(cell(&header, &row, "Nazione Nascita"), "SAN MARINO");
        assert_eq!(cell(&header, &row, "Intestato a"), "CF");
    }
}

mod absence_tests {
    use super::*;

    /// Columns with a documented non-empty default when their source is absent
    const DEFAULTED: [&str; 3] = [
        "Nazione Nascita",
        "Nazionalità Rilascio Documento Riconoscimento",
        "Intestato a",
    ];

    #[test]
    fn test_bare_telecom_record_renders_empty_cells() {
        let exporter = PdaExporter::new(StoredIbanResolver);
        let result = exporter.export(&[bare_record("fastweb", 2)]).unwrap();
        let header = header_cells(&result.content);
        let row = body_cells(&result.content, 1);

        assert_eq!(row.len(), header.len());
        for (name, value) in header.iter().zip(&row) {
            if DEFAULTED.contains(&name.as_str()) {
                continue;
            }
            assert_eq!(value, "", "column {} should be empty", name);
        }
        assert_eq!(cell(&header, &row, "Nazione Nascita"), "ITALIA");
        assert_eq!(cell(&header, &row, "Intestato a"), "CF");
        assert!(!result.content.contains("null"));
    }

    #[test]
    fn test_bare_energy_record_renders_empty_cells() {
        let exporter = PdaExporter::new(StoredIbanResolver);
        let result = exporter.export(&[bare_record("enel_energia", 0)]).unwrap();
        let row = body_cells(&result.content, 1);

        assert_eq!(row.len(), 31);
        assert!(row.iter().all(String::is_empty));
    }

    #[test]
    fn test_empty_nested_entities_render_empty_cells() {
        let record = ExportRecord {
            customer: Some(Customer {
                address: Some(Address::default()),
                ..Default::default()
            }),
            customer_document: Some(Document::default()),
            shipping_address: Some(Address::default()),
            offer: Some(Offer::default()),
            back_office: Some(BackOffice::default()),
            ..bare_record("fastweb", 1)
        };
        let exporter = PdaExporter::new(StoredIbanResolver);
        let result = exporter.export(&[record]).unwrap();
        let header = header_cells(&result.content);
        let row = body_cells(&result.content, 1);

        assert_eq!(cell(&header, &row, "Indirizzo Residenza"), "");
        assert_eq!(cell(&header, &row, "Città Spedizione"), "");
        assert_eq!(cell(&header, &row, "Data Rilascio Documento Riconoscimento"), "");
        assert_eq!(cell(&header, &row, "Delegato"), "");
        assert_eq!(cell(&header, &row, "NP"), "");
        assert_eq!(cell(&header, &row, "NP Dati"), "");
    }

    #[test]
    fn test_supply_floor_default() {
        let record = ExportRecord {
            supply_address: Some(Address::default()),
            ..bare_record("fastweb", 1)
        };
        let exporter = PdaExporter::new(StoredIbanResolver);
        let result = exporter.export(&[record]).unwrap();
        let header = header_cells(&result.content);
        let row = body_cells(&result.content, 1);

        assert_eq!(cell(&header, &row, "Piano Attivazione"), "T");
    }
}

mod orchestration_tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let exporter = PdaExporter::new(StoredIbanResolver);
        let err = exporter.export(&[]).unwrap_err();
        assert!(matches!(err, ExportError::EmptyInput));
        assert!(err.is_bad_request());
    }

    #[test]
    fn test_unknown_mandate_produces_no_output() {
        let exporter = PdaExporter::new(StoredIbanResolver);
        match exporter.export(&[full_record("unknown", 1, 1)]) {
            Err(ExportError::UnmanagedGroup { key }) => assert_eq!(key, "unknown"),
            other => panic!("Expected UnmanagedGroup, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_mandate_key() {
        let exporter = PdaExporter::new(StoredIbanResolver);
        let err = exporter.export(&[ExportRecord::default()]).unwrap_err();
        assert!(matches!(err, ExportError::MissingMandate { index: 0 }));
    }

    #[test]
    fn test_rows_keep_input_order_and_end_with_newline() {
        let exporter = PdaExporter::new(StoredIbanResolver);
        let records: Vec<ExportRecord> = (1..=5)
            .rev()
            .map(|id| full_record("fastweb", 2, id))
            .collect();
        let result = exporter.export(&records).unwrap();

        assert!(result.content.ends_with('\n'));
        assert_eq!(result.content.matches('\n').count(), 6);
        let ids: Vec<String> = (1..=5)
            .map(|n| body_cells(&result.content, n).last().cloned().unwrap())
            .collect();
        assert_eq!(ids, vec!["5", "4", "3", "2", "1"]);
    }

    #[test]
    fn test_mixed_mandates_rejected() {
        let exporter = PdaExporter::new(StoredIbanResolver);
        let records = vec![full_record("fastweb", 1, 1), full_record("enel_energia", 1, 2)];
        match exporter.export(&records) {
            Err(ExportError::MixedRecords { index, found, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(found, "enel_energia/standard");
            }
            other => panic!("Expected MixedRecords, got {:?}", other),
        }
    }

    #[test]
    fn test_mixed_mandates_allowed_when_configured() {
        let config = ExportConfig::default().with_require_homogeneous(false);
        let exporter = PdaExporter::with_config(StoredIbanResolver, config).unwrap();
        let records = vec![full_record("fastweb", 1, 1), full_record("enel_energia", 1, 2)];
        let result = exporter.export(&records).unwrap();

        // Every row is rendered against the first record's schema
        assert_eq!(result.mandate, Mandate::Fastweb);
        assert_eq!(result.rows, 2);
        assert!(
            result
                .content
                .lines()
                .all(|line| line.split(';').count() == 128)
        );
    }

    #[test]
    fn test_resolver_called_once_per_payment() {
        let calls = AtomicUsize::new(0);
        let resolver = FnResolver(|p: &Payment| -> Result<String, ResolveError> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("decrypted-{}", p.iban.as_deref().unwrap_or_default()))
        });
        let exporter = PdaExporter::new(&resolver);
        let records = vec![
            full_record("fastweb", 2, 1),
            bare_record("fastweb", 2),
            full_record("fastweb", 2, 3),
        ];
        let result = exporter.export(&records).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(
            result
                .content
                .contains(";decrypted-IT60X0542811101000000123456;")
        );
    }
}

mod row_failure_tests {
    use super::*;

    /// Fails for the record whose stored IBAN is "BROKEN"
    fn flaky() -> impl BankAccountResolver {
        FnResolver(|p: &Payment| -> Result<String, ResolveError> {
            match p.iban.as_deref() {
                Some("BROKEN") => Err(ResolveError::Failed("cannot decrypt".to_string())),
                other => Ok(other.unwrap_or_default().to_string()),
            }
        })
    }

    fn batch() -> Vec<ExportRecord> {
        let mut broken = full_record("fastweb", 1, 2);
        if let Some(payment) = broken.payment.as_mut() {
            payment.iban = Some("BROKEN".to_string());
        }
        vec![full_record("fastweb", 1, 1), broken, full_record("fastweb", 1, 3)]
    }

    #[test]
    fn test_abort_policy_fails_export() {
        let exporter = PdaExporter::new(flaky());
        match exporter.export(&batch()) {
            Err(ExportError::Row(err)) => {
                assert_eq!(err.index, 1);
                assert_eq!(err.record_id, Some(2));
                assert_eq!(err.column, "IBAN");
                assert_eq!(err.source, ResolveError::Failed("cannot decrypt".to_string()));
            }
            other => panic!("Expected Row error, got {:?}", other),
        }
    }

    #[test]
    fn test_skip_policy_reports_and_continues() {
        let config = ExportConfig::default().with_row_failure_policy(RowFailurePolicy::SkipRow);
        let exporter = PdaExporter::with_config(flaky(), config).unwrap();
        let result = exporter.export(&batch()).unwrap();

        assert_eq!(result.rows, 2);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].record_id, Some(2));
        assert_eq!(result.content.lines().count(), 3);
        assert_eq!(body_cells(&result.content, 1).last().unwrap(), "1");
        assert_eq!(body_cells(&result.content, 2).last().unwrap(), "3");
    }
}
