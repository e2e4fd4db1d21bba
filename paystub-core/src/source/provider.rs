use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ConfigurationError, TaxTableSet};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("Tax tables not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("unknown tax table source '{requested}' (known: {known})")]
    UnknownSource { requested: String, known: String },

    #[error("the '{0}' tax table source needs a table directory")]
    MissingLocation(String),

    #[error("Invalid tax tables: {0}")]
    Invalid(#[from] ConfigurationError),
}

/// Anything that can produce a full [`TaxTableSet`] for one tax year.
///
/// Loading may hit the filesystem or network, so it is async; callers that
/// want the tables fetched once should wrap the source in
/// [`super::SharedTaxTables`].
#[async_trait]
pub trait TaxTableSource: Send + Sync {
    async fn load(&self) -> Result<TaxTableSet, SourceError>;
}

/// A source over tables that are already in memory.
#[derive(Debug, Clone)]
pub struct StaticTaxTables {
    tables: TaxTableSet,
}

impl StaticTaxTables {
    pub fn new(tables: TaxTableSet) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl TaxTableSource for StaticTaxTables {
    async fn load(&self) -> Result<TaxTableSet, SourceError> {
        Ok(self.tables.clone())
    }
}
