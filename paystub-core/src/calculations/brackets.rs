//! Marginal-rate (bracketed) income tax, shared by every jurisdiction.
//!
//! Withholding uses the annualized percentage method: per-period taxable
//! wages are annualized, reduced by the standard deduction and allowances,
//! run through the bracket table, and the annual tax is divided back down.
//!
//! | Step | Amount |
//! |------|--------|
//! | 1    | Annual wages = taxable gross × periods per year |
//! | 2    | Standard deduction for the filing status |
//! | 3    | Allowances × allowance deduction |
//! | 4    | Annual taxable income = Line 1 − Line 2 − Line 3, minimum 0 |
//! | 5    | Annual tax = Σ slice of Line 4 in each bracket × bracket rate |
//! | 6    | Per-period withholding = Line 5 ÷ periods per year |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{annualize, deannualize, non_negative};
use crate::models::{ResolvedIncomeTax, TaxBracket};

/// Tax on `income` under a marginal schedule.
///
/// Each bracket contributes `(min(income, upper) − lower) × rate` for the
/// part of `income` above its lower bound. More income never yields less
/// tax, and the result is continuous across bracket boundaries.
///
/// ```
/// use rust_decimal_macros::dec;
/// use paystub_core::TaxBracket;
/// use paystub_core::calculations::bracketed_tax;
///
/// let brackets = vec![
///     TaxBracket::new(dec!(0), Some(dec!(11925)), dec!(0.10)),
///     TaxBracket::new(dec!(11925), Some(dec!(48475)), dec!(0.12)),
///     TaxBracket::new(dec!(48475), None, dec!(0.22)),
/// ];
///
/// // 1192.50 + (26600 - 11925) × 12%
/// assert_eq!(bracketed_tax(dec!(26600), &brackets), dec!(2953.50));
/// ```
pub fn bracketed_tax(
    income: Decimal,
    brackets: &[TaxBracket],
) -> Decimal {
    brackets
        .iter()
        .take_while(|bracket| bracket.min_income < income)
        .map(|bracket| bracket.taxable_slice(income) * bracket.rate)
        .sum()
}

/// Every line of the annualized withholding computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualizedIncomeTax {
    pub annual_wages: Decimal,
    pub standard_deduction: Decimal,
    pub allowance_deduction: Decimal,
    pub annual_taxable_income: Decimal,
    pub annual_tax: Decimal,
    pub per_period_tax: Decimal,
}

impl AnnualizedIncomeTax {
    /// Runs the annualized percentage method for one period.
    ///
    /// `allowance_value` is the jurisdiction's annual amount per allowance.
    pub fn calculate(
        taxable_gross: Decimal,
        periods_per_year: Decimal,
        tables: &ResolvedIncomeTax<'_>,
        allowances: u32,
        allowance_value: Decimal,
    ) -> Self {
        let annual_wages = annualize(taxable_gross, periods_per_year);
        let allowance_deduction = Decimal::from(allowances) * allowance_value;
        let annual_taxable_income =
            non_negative(annual_wages - tables.standard_deduction - allowance_deduction);
        let annual_tax = bracketed_tax(annual_taxable_income, tables.brackets);

        Self {
            annual_wages,
            standard_deduction: tables.standard_deduction,
            allowance_deduction,
            annual_taxable_income,
            annual_tax,
            per_period_tax: deannualize(annual_tax, periods_per_year),
        }
    }
}
