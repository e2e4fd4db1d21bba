//! Where tax tables come from.
//!
//! Data crates implement [`TaxTableSource`] and register a [`SourceKind`]
//! for it; front ends pick one by name through a [`SourceRegistry`] and keep
//! the loaded tables in a [`SharedTaxTables`].

pub mod cache;
pub mod provider;
pub mod registry;

pub use cache::SharedTaxTables;
pub use provider::{SourceError, StaticTaxTables, TaxTableSource};
pub use registry::{DEFAULT_SOURCE, SourceConfig, SourceKind, SourceRegistry};
