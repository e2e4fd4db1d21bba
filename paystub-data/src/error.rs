use paystub_core::{ConfigurationError, Jurisdiction, SourceError};
use thiserror::Error;

/// Errors that can occur when loading tax table data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaxTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid jurisdiction: {0}")]
    InvalidJurisdiction(String),

    #[error("Invalid {jurisdiction} schedule: {schedule}")]
    InvalidSchedule {
        jurisdiction: Jurisdiction,
        schedule: String,
    },

    #[error(transparent)]
    Invalid(#[from] ConfigurationError),
}

impl From<csv::Error> for TaxTableLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxTableLoaderError::CsvParse(err.to_string())
    }
}

impl From<toml::de::Error> for TaxTableLoaderError {
    fn from(err: toml::de::Error) -> Self {
        TaxTableLoaderError::TomlParse(err.to_string())
    }
}

impl From<TaxTableLoaderError> for SourceError {
    fn from(err: TaxTableLoaderError) -> Self {
        match err {
            TaxTableLoaderError::Invalid(inner) => SourceError::Invalid(inner),
            other => SourceError::Parse(other.to_string()),
        }
    }
}
