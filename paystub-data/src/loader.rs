use std::collections::BTreeMap;

use paystub_core::{
    FederalTables, FilingStatus, IncomeTaxTables, StateTables, TaxBracket, TaxTableSet,
};
use tracing::debug;

use crate::brackets::{BracketRecord, BracketTableLoader};
use crate::error::TaxTableLoaderError;
use crate::rates::{IncomeTaxRates, RateTables};

/// Builds a [`TaxTableSet`] from bracket records and rate tables.
pub struct TaxTableLoader;

impl TaxTableLoader {
    /// Combines bracket records with rates and validates the result.
    ///
    /// # Errors
    ///
    /// * [`TaxTableLoaderError::InvalidJurisdiction`] or
    ///   [`TaxTableLoaderError::InvalidSchedule`] for unrecognised records.
    /// * [`TaxTableLoaderError::Invalid`] when the assembled tables break an
    ///   invariant, e.g. a gap between brackets.
    pub fn assemble(
        records: &[BracketRecord],
        rates: RateTables,
    ) -> Result<TaxTableSet, TaxTableLoaderError> {
        let brackets = BracketTableLoader::group(records)?;

        let tables = TaxTableSet {
            tax_year: rates.tax_year,
            federal: FederalTables {
                income_tax: income_tax(brackets.federal, rates.federal.income_tax),
                social_security: rates.federal.social_security,
                medicare: rates.federal.medicare,
            },
            state: StateTables {
                name: rates.state.name,
                income_tax: income_tax(brackets.state, rates.state.income_tax),
                disability: rates.state.disability,
                family_leave: rates.state.family_leave,
                local_taxes: rates.state.local_taxes,
            },
        };

        tables.validate()?;

        debug!(
            tax_year = tables.tax_year,
            federal_statuses = tables.federal.income_tax.brackets.len(),
            state_statuses = tables.state.income_tax.brackets.len(),
            "Assembled tax tables"
        );

        Ok(tables)
    }

    /// Parses CSV bracket data and TOML rates, then assembles them.
    pub fn from_strs(
        brackets_csv: &str,
        rates_toml: &str,
    ) -> Result<TaxTableSet, TaxTableLoaderError> {
        let records = BracketTableLoader::parse(brackets_csv.as_bytes())?;
        let rates = RateTables::parse(rates_toml)?;
        Self::assemble(&records, rates)
    }
}

fn income_tax(
    brackets: BTreeMap<FilingStatus, Vec<TaxBracket>>,
    rates: IncomeTaxRates,
) -> IncomeTaxTables {
    IncomeTaxTables {
        brackets,
        standard_deductions: rates.standard_deductions,
        allowance_deduction: rates.allowance_deduction,
        fallback_status: rates.fallback_status,
    }
}
