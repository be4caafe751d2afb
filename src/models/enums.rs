//! Enumerations shared by records and schemas

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Commercial partner a contract application belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mandate {
    /// Energy supply contracts
    EnelEnergia,
    /// Telecom (fixed and mobile) contracts
    Fastweb,
}

impl Mandate {
    pub const ALL: [Mandate; 2] = [Mandate::EnelEnergia, Mandate::Fastweb];

    /// Lookup key as stored on the record group
    pub fn key(&self) -> &'static str {
        match self {
            Mandate::EnelEnergia => "enel_energia",
            Mandate::Fastweb => "fastweb",
        }
    }
}

impl fmt::Display for Mandate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Mandate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "enel_energia" => Ok(Mandate::EnelEnergia),
            "fastweb" => Ok(Mandate::Fastweb),
            _ => Err(s.to_string()),
        }
    }
}

/// How the voice line is activated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineActivation {
    /// Brand new line ("linea nuova")
    #[serde(rename = "LN")]
    NewLine,
    /// Number ported from another operator
    #[serde(rename = "NP")]
    NumberPortability,
}

impl LineActivation {
    /// Whether the number is being ported
    pub fn is_portability(&self) -> bool {
        matches!(self, LineActivation::NumberPortability)
    }
}
