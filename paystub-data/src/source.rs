use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use paystub_core::source::{DEFAULT_SOURCE, SourceKind, SourceRegistry};
use paystub_core::{SourceError, TaxTableSet, TaxTableSource};
use tracing::info;

use crate::loader::TaxTableLoader;

/// File name of the bracket table inside a table directory.
pub const BRACKETS_FILE: &str = "brackets.csv";
/// File name of the rate table inside a table directory.
pub const RATES_FILE: &str = "rates.toml";

const BUNDLED_BRACKETS: &str = include_str!("../data/2025/brackets.csv");
const BUNDLED_RATES: &str = include_str!("../data/2025/rates.toml");

/// Reads `brackets.csv` and `rates.toml` from a directory.
#[derive(Debug, Clone)]
pub struct FileTaxTableSource {
    dir: PathBuf,
}

impl FileTaxTableSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

async fn read_table_file(path: &Path) -> Result<String, SourceError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|err| match err.kind() {
            ErrorKind::NotFound => SourceError::NotFound(path.display().to_string()),
            _ => SourceError::Io(format!("{}: {err}", path.display())),
        })
}

#[async_trait]
impl TaxTableSource for FileTaxTableSource {
    async fn load(&self) -> Result<TaxTableSet, SourceError> {
        let brackets = read_table_file(&self.dir.join(BRACKETS_FILE)).await?;
        let rates = read_table_file(&self.dir.join(RATES_FILE)).await?;

        let tables = TaxTableLoader::from_strs(&brackets, &rates)?;
        info!(
            dir = %self.dir.display(),
            tax_year = tables.tax_year,
            "Read tax tables from disk"
        );
        Ok(tables)
    }
}

/// The 2025 federal and New Jersey tables compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledTaxTableSource;

#[async_trait]
impl TaxTableSource for BundledTaxTableSource {
    async fn load(&self) -> Result<TaxTableSet, SourceError> {
        Ok(TaxTableLoader::from_strs(BUNDLED_BRACKETS, BUNDLED_RATES)?)
    }
}

/// Selects [`FileTaxTableSource`]; the location is the table directory.
pub struct FileSourceKind;

impl SourceKind for FileSourceKind {
    fn name(&self) -> &'static str {
        "files"
    }

    fn needs_location(&self) -> bool {
        true
    }

    fn build(
        &self,
        location: Option<&Path>,
    ) -> Result<Box<dyn TaxTableSource>, SourceError> {
        let dir = location.ok_or_else(|| SourceError::MissingLocation(self.name().to_string()))?;
        Ok(Box::new(FileTaxTableSource::new(dir)))
    }
}

/// Selects [`BundledTaxTableSource`].
pub struct BundledSourceKind;

impl SourceKind for BundledSourceKind {
    fn name(&self) -> &'static str {
        DEFAULT_SOURCE
    }

    fn build(
        &self,
        _location: Option<&Path>,
    ) -> Result<Box<dyn TaxTableSource>, SourceError> {
        Ok(Box::new(BundledTaxTableSource))
    }
}

/// Registers every source this crate provides.
pub fn register_sources(registry: &mut SourceRegistry) {
    registry.register(Box::new(BundledSourceKind));
    registry.register(Box::new(FileSourceKind));
}

/// A registry with every source this crate provides.
pub fn default_registry() -> SourceRegistry {
    let mut registry = SourceRegistry::new();
    register_sources(&mut registry);
    registry
}
