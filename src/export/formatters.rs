//! Field formatters
//!
//! Pure functions turning a nullable value into the display string written to
//! the export. Absence always renders as an empty string.

use std::fmt::{Display, Write};

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Literal written for a true flag
pub const TRUE_FLAG: &str = "VERO";
/// Literal written for a false flag
pub const FALSE_FLAG: &str = "FALSO";

/// Plain text, absent renders empty
pub fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

/// Upper-cased text, absent renders empty
pub fn upper(value: Option<&str>) -> String {
    value.map(str::to_uppercase).unwrap_or_default()
}

/// Integer rendered in decimal, absent renders empty
pub fn number(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Writes a chrono `DelayedFormat`; a pattern the value cannot satisfy renders empty
fn formatted(value: impl Display) -> String {
    let mut out = String::new();
    match write!(out, "{}", value) {
        Ok(()) => out,
        Err(_) => String::new(),
    }
}

/// Calendar date with the given chrono pattern
pub fn date(value: Option<NaiveDate>, pattern: &str) -> String {
    value
        .map(|d| formatted(d.format(pattern)))
        .unwrap_or_default()
}

/// Timestamp converted to the civil calendar of `tz`, then formatted
pub fn local_date(value: Option<DateTime<Utc>>, tz: Tz, pattern: &str) -> String {
    value
        .map(|ts| formatted(ts.with_timezone(&tz).format(pattern)))
        .unwrap_or_default()
}

/// Country/nationality with fallback
///
/// A null or empty value is replaced by `fallback`; the result is upper-cased.
/// Whitespace counts as a value.
pub fn country_or(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_uppercase(),
        _ => fallback.to_uppercase(),
    }
}

/// `"<toponym> <street>"` upper-cased, empty unless both parts are present
pub fn street_line(toponym: Option<&str>, street: Option<&str>) -> String {
    match (toponym, street) {
        (Some(t), Some(s)) => format!("{} {}", t, s).to_uppercase(),
        _ => String::new(),
    }
}

/// `VERO`/`FALSO`, absent renders empty
pub fn flag(value: Option<bool>) -> String {
    match value {
        Some(true) => TRUE_FLAG.to_string(),
        Some(false) => FALSE_FLAG.to_string(),
        None => String::new(),
    }
}

/// Bank account holder kind: `CF` for a private person, `PIVA` for a company
///
/// A null or zero customer type code means a private person.
pub fn holder_kind(bank_customer_type: Option<i64>) -> &'static str {
    match bank_customer_type {
        None | Some(0) => "CF",
        Some(_) => "PIVA",
    }
}

/// Display label of an enum-like code: `SOLO_FISSO` becomes `Solo Fisso`
pub fn enum_label(code: Option<&str>) -> String {
    let Some(code) = code else {
        return String::new();
    };
    code.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
