//! Flat rates, wage bases and deductions, read from TOML.
//!
//! ```toml
//! tax_year = 2025
//!
//! [federal.income_tax]
//! allowance_deduction = 0
//!
//! [federal.income_tax.standard_deductions]
//! S = 15000
//! MFJ = 30000
//!
//! [federal.social_security]
//! rate = "0.062"
//! wage_base = 176100
//!
//! [federal.medicare]
//! rate = "0.0145"
//! additional_rate = "0.009"
//! additional_threshold = 200000
//!
//! [state]
//! name = "NJ"
//!
//! [state.income_tax]
//! allowance_deduction = 1000
//! fallback_status = "S"
//!
//! [state.income_tax.standard_deductions]
//! S = 0
//!
//! [state.disability]
//! rate = "0.0023"
//! wage_base = 165400
//!
//! [state.family_leave]
//! rate = "0.0033"
//! wage_base = 165400
//!
//! [[state.local_taxes]]
//! name = "Newark"
//! rate = "0.01"
//! ```

use std::collections::BTreeMap;

use paystub_core::{CappedContribution, FilingStatus, LocalTax, MedicareRates};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::TaxTableLoaderError;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct IncomeTaxRates {
    pub standard_deductions: BTreeMap<FilingStatus, Decimal>,
    #[serde(default)]
    pub allowance_deduction: Decimal,
    #[serde(default)]
    pub fallback_status: Option<FilingStatus>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FederalRates {
    pub income_tax: IncomeTaxRates,
    pub social_security: CappedContribution,
    pub medicare: MedicareRates,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StateRates {
    pub name: String,
    pub income_tax: IncomeTaxRates,
    pub disability: CappedContribution,
    pub family_leave: CappedContribution,
    #[serde(default)]
    pub local_taxes: Vec<LocalTax>,
}

/// Everything in a tax table set except the bracket schedules.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RateTables {
    pub tax_year: i32,
    pub federal: FederalRates,
    pub state: StateRates,
}

impl RateTables {
    pub fn parse(contents: &str) -> Result<Self, TaxTableLoaderError> {
        Ok(toml::from_str(contents)?)
    }
}
