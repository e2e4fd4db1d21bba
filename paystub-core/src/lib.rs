pub mod calculations;
pub mod models;
pub mod source;

pub use calculations::{FieldError, InputError, PayrollEngine, PayrollError};
pub use models::*;
pub use source::{SharedTaxTables, SourceError, TaxTableSource};
