//! Payroll calculations.
//!
//! [`payroll`] drives a full pay period; the other modules hold the pieces
//! it is built from so they can be checked on their own.

pub mod brackets;
pub mod common;
pub mod contributions;
pub mod payroll;

pub use brackets::{AnnualizedIncomeTax, bracketed_tax};
pub use contributions::{capped_contribution, medicare};
pub use payroll::{FieldError, InputError, PayrollEngine, PayrollError};
