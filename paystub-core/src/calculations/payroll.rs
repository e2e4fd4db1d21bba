//! Per-period payroll calculation.
//!
//! [`PayrollEngine::calculate`] turns one pay period's earnings and
//! deductions into gross pay, withholding, net pay and the updated
//! year-to-date totals.
//!
//! # Calculation Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Gross pay: sum of earning lines (overtime ×1.5, double time ×2, flat kinds as entered) |
//! | 2    | Taxable gross: gross − pre-tax deductions, minimum 0 |
//! | 3a   | Federal income tax: annualized bracket method |
//! | 3b   | Social Security: rate × wages below the wage base |
//! | 3c   | Medicare: rate × taxable gross, plus surtax on wages newly above the threshold |
//! | 4a   | State income tax: annualized bracket method with the state tables |
//! | 4b   | State disability and family leave: capped like Social Security |
//! | 4c   | Local taxes: rate × taxable gross for residents |
//! | 5    | Net pay: gross − taxes − pre-tax − post-tax (may be negative) |
//! | 6    | YTD: previous totals + this period |
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use rust_decimal_macros::dec;
//! use paystub_core::calculations::PayrollEngine;
//! use paystub_core::calculations::common::round_half_up;
//! use paystub_core::*;
//!
//! let flat = |rate| BTreeMap::from([(
//!     FilingStatus::Single,
//!     vec![TaxBracket::new(dec!(0), None, rate)],
//! )]);
//!
//! let tables = TaxTableSet {
//!     tax_year: 2025,
//!     federal: FederalTables {
//!         income_tax: IncomeTaxTables {
//!             brackets: flat(dec!(0.10)),
//!             standard_deductions: BTreeMap::from([(FilingStatus::Single, dec!(15000))]),
//!             allowance_deduction: dec!(0),
//!             fallback_status: None,
//!         },
//!         social_security: CappedContribution { rate: dec!(0.062), wage_base: dec!(176100) },
//!         medicare: MedicareRates {
//!             rate: dec!(0.0145),
//!             additional_rate: dec!(0.009),
//!             additional_threshold: dec!(200000),
//!         },
//!     },
//!     state: StateTables {
//!         name: "NJ".to_string(),
//!         income_tax: IncomeTaxTables {
//!             brackets: flat(dec!(0)),
//!             standard_deductions: BTreeMap::from([(FilingStatus::Single, dec!(0))]),
//!             allowance_deduction: dec!(0),
//!             fallback_status: None,
//!         },
//!         disability: CappedContribution { rate: dec!(0), wage_base: dec!(165400) },
//!         family_leave: CappedContribution { rate: dec!(0), wage_base: dec!(165400) },
//!         local_taxes: Vec::new(),
//!     },
//! };
//!
//! let input = PayPeriodInput {
//!     earnings: vec![EarningLine::hourly(EarningKind::Regular, dec!(20), dec!(40))],
//!     deductions: Vec::new(),
//!     pay_frequency: PayFrequency::Weekly,
//!     filing_status: FilingStatus::Single,
//!     allowances: 0,
//!     local_resident: false,
//! };
//!
//! let engine = PayrollEngine::new(&tables).unwrap();
//! let result = engine.calculate(&input, &YtdAccumulators::default()).unwrap();
//!
//! assert_eq!(result.gross_pay, dec!(800));
//! // (800 × 52 − 15000) × 10% ÷ 52
//! assert_eq!(round_half_up(result.taxes.federal_income), dec!(51.15));
//! assert_eq!(result.taxes.social_security, dec!(49.60));
//! assert_eq!(result.taxes.medicare, dec!(11.60));
//! assert_eq!(result.rounded().net_pay, dec!(687.65));
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::brackets::AnnualizedIncomeTax;
use crate::calculations::common::non_negative;
use crate::calculations::contributions::{capped_contribution, medicare};
use crate::models::{
    ConfigurationError, EarningAmount, Jurisdiction, PayPeriodInput, PayPeriodResult,
    TaxBreakdown, TaxTableSet, ValidationWarning, YtdAccumulators, deduction_totals,
};

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    /// Path to the field, e.g. `earnings[1].hours`.
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(
        field: String,
        message: &str,
    ) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

/// Input rejected before calculation began, with every offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid input: {}", describe(.fields))]
pub struct InputError {
    pub fields: Vec<FieldError>,
}

/// Errors that stop a payroll calculation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayrollError {
    /// Tax tables or pay frequency are unusable.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Input(#[from] InputError),
}

fn describe(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Payroll calculator bound to one validated [`TaxTableSet`].
///
/// The engine holds no mutable state; one instance can serve any number of
/// employees and periods, including from several threads at once.
#[derive(Debug, Clone, Copy)]
pub struct PayrollEngine<'a> {
    tables: &'a TaxTableSet,
}

impl<'a> PayrollEngine<'a> {
    /// Creates an engine after validating `tables`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] found by
    /// [`TaxTableSet::validate`].
    pub fn new(tables: &'a TaxTableSet) -> Result<Self, ConfigurationError> {
        tables.validate()?;
        Ok(Self { tables })
    }

    /// Calculates one pay period.
    ///
    /// `ytd` holds totals for earlier periods of the year; the returned
    /// result carries the new totals in [`PayPeriodResult::ytd`].
    ///
    /// # Errors
    ///
    /// * [`PayrollError::Input`] listing every negative or out-of-range rate,
    ///   hours value, deduction amount or YTD total.
    /// * [`PayrollError::Configuration`] when a jurisdiction has no table for
    ///   the filing status and no fallback is configured.
    pub fn calculate(
        &self,
        input: &PayPeriodInput,
        ytd: &YtdAccumulators,
    ) -> Result<PayPeriodResult, PayrollError> {
        validate_input(input, ytd)?;

        let periods = input.pay_frequency.periods();
        let mut warnings = Vec::new();

        // Step 1: gross pay
        let earnings: Vec<EarningAmount> = input.earnings.iter().map(EarningAmount::from).collect();
        let gross_pay: Decimal = earnings.iter().map(|line| line.amount).sum();

        // Step 2: pre-tax deductions
        let (pre_tax_deductions, post_tax_deductions) = deduction_totals(&input.deductions);
        let taxable_gross = self.taxable_gross(gross_pay, pre_tax_deductions, &mut warnings);

        // Steps 3a, 4a: income taxes
        let federal_income = self.income_tax(
            Jurisdiction::Federal,
            input,
            taxable_gross,
            periods,
            &mut warnings,
        )?;
        let state_income = self.income_tax(
            Jurisdiction::State,
            input,
            taxable_gross,
            periods,
            &mut warnings,
        )?;

        // Steps 3b, 3c: federal contributions
        let federal = &self.tables.federal;
        let social_security =
            capped_contribution(taxable_gross, ytd.taxable_gross, &federal.social_security);
        let (medicare, additional_medicare) =
            medicare(taxable_gross, ytd.taxable_gross, &federal.medicare);

        // Steps 4b, 4c: state contributions and local taxes
        let state = &self.tables.state;
        let state_disability =
            capped_contribution(taxable_gross, ytd.taxable_gross, &state.disability);
        let state_family_leave =
            capped_contribution(taxable_gross, ytd.taxable_gross, &state.family_leave);
        let local = self.local_taxes(taxable_gross, input.local_resident);

        let taxes = TaxBreakdown {
            federal_income,
            social_security,
            medicare,
            additional_medicare,
            state_income,
            state_disability,
            state_family_leave,
            local,
        };
        let total_taxes = taxes.total();

        // Step 5: net pay
        let net_pay = gross_pay - total_taxes - pre_tax_deductions - post_tax_deductions;
        if net_pay < Decimal::ZERO {
            warn!(
                gross_pay = %gross_pay,
                total_taxes = %total_taxes,
                net_pay = %net_pay,
                "Net pay is negative; withholding and deductions exceed gross pay"
            );
            warnings.push(ValidationWarning::NegativeNetPay { net_pay });
        }

        debug!(
            gross_pay = %gross_pay,
            taxable_gross = %taxable_gross,
            total_taxes = %total_taxes,
            net_pay = %net_pay,
            "Calculated pay period"
        );

        // Step 6: year to date
        let mut result = PayPeriodResult {
            earnings,
            gross_pay,
            pre_tax_deductions,
            post_tax_deductions,
            taxable_gross,
            taxes,
            total_taxes,
            net_pay,
            warnings,
            ytd: YtdAccumulators::default(),
        };
        result.ytd = ytd.accumulate(&result);

        Ok(result)
    }

    /// Gross pay less pre-tax deductions, clamped at zero.
    fn taxable_gross(
        &self,
        gross_pay: Decimal,
        pre_tax_deductions: Decimal,
        warnings: &mut Vec<ValidationWarning>,
    ) -> Decimal {
        if pre_tax_deductions > gross_pay {
            warn!(
                gross_pay = %gross_pay,
                pre_tax_deductions = %pre_tax_deductions,
                "Pre-tax deductions exceed gross pay; taxable gross set to zero"
            );
            warnings.push(ValidationWarning::PreTaxDeductionsExceedGross {
                gross_pay,
                pre_tax_deductions,
            });
        }
        non_negative(gross_pay - pre_tax_deductions)
    }

    /// Per-period income tax withholding for one jurisdiction.
    fn income_tax(
        &self,
        jurisdiction: Jurisdiction,
        input: &PayPeriodInput,
        taxable_gross: Decimal,
        periods: Decimal,
        warnings: &mut Vec<ValidationWarning>,
    ) -> Result<Decimal, ConfigurationError> {
        let tables = self.tables.income_tax(jurisdiction);
        let resolved = tables.resolve(jurisdiction, input.filing_status)?;

        if resolved.used_fallback() {
            warn!(
                %jurisdiction,
                requested = resolved.requested.as_str(),
                used = resolved.status.as_str(),
                "No bracket table for filing status; using configured fallback"
            );
            warnings.push(ValidationWarning::FilingStatusFallback {
                jurisdiction,
                requested: resolved.requested,
                used: resolved.status,
            });
        }

        let worksheet = AnnualizedIncomeTax::calculate(
            taxable_gross,
            periods,
            &resolved,
            input.allowances,
            tables.allowance_deduction,
        );

        debug!(
            %jurisdiction,
            annual_wages = %worksheet.annual_wages,
            annual_taxable_income = %worksheet.annual_taxable_income,
            annual_tax = %worksheet.annual_tax,
            "Annualized income tax"
        );

        Ok(worksheet.per_period_tax)
    }

    /// Flat local taxes, charged only to residents.
    fn local_taxes(
        &self,
        taxable_gross: Decimal,
        resident: bool,
    ) -> BTreeMap<String, Decimal> {
        if !resident {
            return BTreeMap::new();
        }
        self.tables
            .state
            .local_taxes
            .iter()
            .map(|local| (local.name.clone(), taxable_gross * local.rate))
            .collect()
    }
}

/// Largest rate or deduction amount accepted for one line (1,000,000,000,000).
const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);
/// Largest hours value accepted for one line.
const MAX_HOURS: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);
/// Largest magnitude accepted for a year-to-date total (10^18).
const MAX_YTD: Decimal = Decimal::from_parts(0xA764_0000, 0x0DE0_B6B3, 0, false, 0);

/// Checks `value` lies in `0..=max`.
fn check_range(
    errors: &mut Vec<FieldError>,
    field: impl FnOnce() -> String,
    value: Decimal,
    max: Decimal,
) {
    if value < Decimal::ZERO {
        errors.push(FieldError::new(field(), "must not be negative"));
    } else if value > max {
        errors.push(FieldError::new(field(), &format!("must not exceed {max}")));
    }
}

/// Named year-to-date totals, for range checks.
fn ytd_fields(ytd: &YtdAccumulators) -> Vec<(String, Decimal)> {
    let taxes = &ytd.taxes;
    let mut fields: Vec<(String, Decimal)> = [
        ("gross_pay", ytd.gross_pay),
        ("taxable_gross", ytd.taxable_gross),
        ("pre_tax_deductions", ytd.pre_tax_deductions),
        ("post_tax_deductions", ytd.post_tax_deductions),
        ("net_pay", ytd.net_pay),
        ("taxes.federal_income", taxes.federal_income),
        ("taxes.social_security", taxes.social_security),
        ("taxes.medicare", taxes.medicare),
        ("taxes.additional_medicare", taxes.additional_medicare),
        ("taxes.state_income", taxes.state_income),
        ("taxes.state_disability", taxes.state_disability),
        ("taxes.state_family_leave", taxes.state_family_leave),
    ]
    .into_iter()
    .map(|(name, value)| (format!("ytd.{name}"), value))
    .collect();

    fields.extend(
        taxes
            .local
            .iter()
            .map(|(name, value)| (format!("ytd.taxes.local[{name}]"), *value)),
    );
    fields.extend(
        ytd.earnings
            .iter()
            .map(|(kind, value)| (format!("ytd.earnings[{kind}]"), *value)),
    );
    fields
}

/// Rejects negative or out-of-range rates, hours, deduction amounts and
/// YTD totals, reporting every offending field at once.
///
/// The upper limits keep every later sum and product well inside
/// [`Decimal`]'s range, so calculation itself cannot overflow.
fn validate_input(
    input: &PayPeriodInput,
    ytd: &YtdAccumulators,
) -> Result<(), PayrollError> {
    let mut errors = Vec::new();

    for (index, line) in input.earnings.iter().enumerate() {
        check_range(
            &mut errors,
            || format!("earnings[{index}].rate"),
            line.rate,
            MAX_AMOUNT,
        );
        check_range(
            &mut errors,
            || format!("earnings[{index}].hours"),
            line.hours,
            MAX_HOURS,
        );
    }

    for (index, line) in input.deductions.iter().enumerate() {
        check_range(
            &mut errors,
            || format!("deductions[{index}].amount"),
            line.amount,
            MAX_AMOUNT,
        );
    }

    // Net pay may legitimately be negative, so totals are bounded by size only.
    for (field, value) in ytd_fields(ytd) {
        if value.abs() > MAX_YTD {
            errors.push(FieldError::new(field, &format!("must not exceed {MAX_YTD}")));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(InputError { fields: errors }.into())
    }
}
