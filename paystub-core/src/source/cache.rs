use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::info;

use super::provider::{SourceError, StaticTaxTables, TaxTableSource};
use crate::models::{ConfigurationError, TaxTableSet};

/// Fetch-once cache in front of a [`TaxTableSource`].
///
/// The first call to [`SharedTaxTables::get`] loads and validates the
/// tables; concurrent first callers wait on that single load. A failed load
/// leaves the cache empty so a later call can retry. Once loaded, every
/// caller receives the same `Arc`.
pub struct SharedTaxTables {
    source: Box<dyn TaxTableSource>,
    tables: OnceCell<Arc<TaxTableSet>>,
}

impl SharedTaxTables {
    pub fn new(source: Box<dyn TaxTableSource>) -> Self {
        Self {
            source,
            tables: OnceCell::new(),
        }
    }

    /// A cache that is already populated with `tables`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] in `tables`.
    pub fn preloaded(tables: TaxTableSet) -> Result<Self, ConfigurationError> {
        tables.validate()?;
        let shared = Arc::new(tables.clone());
        Ok(Self {
            source: Box::new(StaticTaxTables::new(tables)),
            tables: OnceCell::new_with(Some(shared)),
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.tables.initialized()
    }

    /// Returns the cached tables, loading them on first use.
    ///
    /// # Errors
    ///
    /// * Any error the underlying source returns.
    /// * [`SourceError::Invalid`] when the loaded tables fail validation.
    pub async fn get(&self) -> Result<Arc<TaxTableSet>, SourceError> {
        self.tables
            .get_or_try_init(|| async {
                let tables = self.source.load().await?;
                tables.validate()?;
                info!(
                    tax_year = tables.tax_year,
                    state = %tables.state.name,
                    "Loaded tax tables"
                );
                Ok(Arc::new(tables))
            })
            .await
            .cloned()
    }
}

impl std::fmt::Debug for SharedTaxTables {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("SharedTaxTables")
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}
