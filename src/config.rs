//! Configuration for CSV export operations

use std::fmt::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating an [`ExportConfig`]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("Failed to read config file: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Date pattern chrono cannot format with
    #[error("Invalid date format: {0:?}")]
    InvalidDateFormat(String),
}

/// What to do when a single row fails to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowFailurePolicy {
    /// Fail the whole export on the first failing row
    #[default]
    Abort,
    /// Leave the failing row out and report it in the result
    SkipRow,
}

impl std::fmt::Display for RowFailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowFailurePolicy::Abort => write!(f, "abort"),
            RowFailurePolicy::SkipRow => write!(f, "skip-row"),
        }
    }
}

impl std::str::FromStr for RowFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(RowFailurePolicy::Abort),
            "skip-row" | "skip" => Ok(RowFailurePolicy::SkipRow),
            _ => Err(format!("Unknown row failure policy: {}", s)),
        }
    }
}

/// Export configuration
///
/// # Example
///
/// ```rust
/// use pda_export::config::{ExportConfig, RowFailurePolicy};
///
/// let config = ExportConfig::from_toml_str(r#"
///     default_country = "italia"
///     row_failure_policy = "skip-row"
/// "#).unwrap();
/// assert_eq!(config.row_failure_policy, RowFailurePolicy::SkipRow);
/// assert_eq!(config.date_format, "%d/%m/%Y");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// chrono pattern used for every date column
    pub date_format: String,
    /// Civil calendar the creation timestamp is converted to
    pub timezone: Tz,
    /// Substituted when a nationality/country field is null or empty
    pub default_country: String,
    /// Substituted when the supply address has no floor
    pub default_floor: String,
    /// Row failure handling
    pub row_failure_policy: RowFailurePolicy,
    /// Reject exports mixing mandates or schema variants
    pub require_homogeneous: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            date_format: "%d/%m/%Y".to_string(),
            timezone: chrono_tz::Europe::Rome,
            default_country: "ITALIA".to_string(),
            default_floor: "T".to_string(),
            row_failure_policy: RowFailurePolicy::Abort,
            require_homogeneous: true,
        }
    }
}

impl ExportConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ExportConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Check the date pattern is usable
    ///
    /// The pattern must format a plain calendar date: time and offset
    /// specifiers (`%H`, `%z`, ...) are rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidDateFormat(self.date_format.clone());

        if self.date_format.trim().is_empty()
            || StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error))
        {
            return Err(invalid());
        }

        let sample = NaiveDate::from_ymd_opt(2024, 3, 5).ok_or_else(invalid)?;
        let mut rendered = String::new();
        write!(rendered, "{}", sample.format(&self.date_format)).map_err(|_| invalid())?;
        Ok(())
    }

    /// Set the date pattern
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Set the timezone of the creation timestamp
    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.timezone = tz;
        self
    }

    /// Set the fallback country literal
    pub fn with_default_country(mut self, country: impl Into<String>) -> Self {
        self.default_country = country.into();
        self
    }

    /// Set the row failure policy
    pub fn with_row_failure_policy(mut self, policy: RowFailurePolicy) -> Self {
        self.row_failure_policy = policy;
        self
    }

    /// Enable/disable the single mandate/variant check
    pub fn with_require_homogeneous(mut self, enabled: bool) -> Self {
        self.require_homogeneous = enabled;
        self
    }
}
