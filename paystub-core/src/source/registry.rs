//! Choosing a tax table source by name.
//!
//! Front ends turn user input into a [`SourceConfig`] and hand it to
//! [`SourceRegistry::open`], which picks the matching [`SourceKind`], checks
//! that a table directory was given when the kind needs one, and returns the
//! source already wrapped in a fetch-once [`SharedTaxTables`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::cache::SharedTaxTables;
use super::provider::{SourceError, TaxTableSource};

/// Name of the source used when none is requested.
pub const DEFAULT_SOURCE: &str = "bundled";

/// Which source to load tables from, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub source: String,
    /// Table directory, for sources that read from disk.
    pub location: Option<PathBuf>,
}

impl SourceConfig {
    pub fn named(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            location: None,
        }
    }

    pub fn at(
        source: impl Into<String>,
        location: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source: source.into(),
            location: Some(location.into()),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::named(DEFAULT_SOURCE)
    }
}

/// A kind of tax table source that can be selected by name.
pub trait SourceKind: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether [`SourceKind::build`] needs a table directory.
    fn needs_location(&self) -> bool {
        false
    }

    /// Builds the source. `location` is always `Some` when
    /// [`SourceKind::needs_location`] is true.
    fn build(
        &self,
        location: Option<&Path>,
    ) -> Result<Box<dyn TaxTableSource>, SourceError>;
}

/// The source kinds a front end can choose from.
#[derive(Default)]
pub struct SourceRegistry {
    kinds: BTreeMap<&'static str, Box<dyn SourceKind>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        kind: Box<dyn SourceKind>,
    ) {
        self.kinds.insert(kind.name(), kind);
    }

    /// Registered source names, in alphabetical order.
    pub fn names(&self) -> Vec<&'static str> {
        self.kinds.keys().copied().collect()
    }

    /// Builds the configured source behind a fetch-once cache. Nothing is
    /// loaded until [`SharedTaxTables::get`] is first called.
    ///
    /// # Errors
    ///
    /// * [`SourceError::UnknownSource`] when no kind has that name.
    /// * [`SourceError::MissingLocation`] when the kind reads from disk and
    ///   no directory was given.
    /// * Whatever [`SourceKind::build`] returns.
    pub fn open(
        &self,
        config: &SourceConfig,
    ) -> Result<SharedTaxTables, SourceError> {
        let kind = self.kinds.get(config.source.as_str()).ok_or_else(|| {
            SourceError::UnknownSource {
                requested: config.source.clone(),
                known: self.names().join(", "),
            }
        })?;

        let location = config.location.as_deref();
        if kind.needs_location() && location.is_none_or(|dir| dir.as_os_str().is_empty()) {
            return Err(SourceError::MissingLocation(kind.name().to_string()));
        }

        debug!(source = kind.name(), ?location, "Opening tax table source");
        Ok(SharedTaxTables::new(kind.build(location)?))
    }
}
