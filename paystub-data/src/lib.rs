//! Tax table data for the payroll engine.
//!
//! Bracket schedules live in CSV and flat rates in TOML; [`TaxTableLoader`]
//! combines them into a validated [`paystub_core::TaxTableSet`]. The
//! [`source`] module exposes them through the core source contract, either
//! from a directory or from the bundled 2025 federal and New Jersey data.

mod brackets;
mod error;
mod loader;
mod rates;
pub mod source;

pub use brackets::{BracketRecord, BracketTableLoader, BracketTables};
pub use error::TaxTableLoaderError;
pub use loader::TaxTableLoader;
pub use rates::{FederalRates, IncomeTaxRates, RateTables, StateRates};
pub use source::{
    BundledSourceKind, BundledTaxTableSource, FileSourceKind, FileTaxTableSource,
    default_registry, register_sources,
};
