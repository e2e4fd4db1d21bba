//! Tax tables consumed by the payroll engine.
//!
//! A [`TaxTableSet`] is loaded once (see [`crate::source`]) and then only
//! read. [`TaxTableSet::validate`] checks every invariant the engine relies
//! on so that a bad table is rejected before any pay period is computed.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{FilingStatus, TaxBracket};

/// Taxing authority a table or contribution belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Jurisdiction {
    Federal,
    State,
}

impl fmt::Display for Jurisdiction {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Federal => f.write_str("federal"),
            Self::State => f.write_str("state"),
        }
    }
}

/// Unrecoverable problems with tax tables or pay-period configuration.
///
/// Any of these aborts a calculation; nothing partial is returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("unknown pay frequency '{0}'")]
    UnknownPayFrequency(String),

    #[error("unknown filing status '{0}'")]
    UnknownFilingStatus(String),

    #[error("no {jurisdiction} bracket table for filing status {status}")]
    MissingBrackets {
        jurisdiction: Jurisdiction,
        status: FilingStatus,
    },

    #[error("no {jurisdiction} standard deduction for filing status {status}")]
    MissingStandardDeduction {
        jurisdiction: Jurisdiction,
        status: FilingStatus,
    },

    #[error("{jurisdiction} bracket table for {status} is empty")]
    EmptyBracketTable {
        jurisdiction: Jurisdiction,
        status: FilingStatus,
    },

    #[error("{jurisdiction} bracket table for {status} must start at zero, starts at {start}")]
    BracketTableNotFromZero {
        jurisdiction: Jurisdiction,
        status: FilingStatus,
        start: Decimal,
    },

    #[error("{jurisdiction} bracket {index} for {status} does not start where the previous one ends")]
    BracketsNotContiguous {
        jurisdiction: Jurisdiction,
        status: FilingStatus,
        index: usize,
    },

    #[error("{jurisdiction} bracket {index} for {status} has an upper bound not above its lower bound")]
    InvalidBracketBounds {
        jurisdiction: Jurisdiction,
        status: FilingStatus,
        index: usize,
    },

    #[error("{jurisdiction} bracket table for {status} must end with an unbounded bracket")]
    FinalBracketBounded {
        jurisdiction: Jurisdiction,
        status: FilingStatus,
    },

    #[error("{name} rate must be between 0 and 1, got {rate}")]
    InvalidRate { name: String, rate: Decimal },

    #[error("{name} wage base must be positive, got {amount}")]
    InvalidWageBase { name: String, amount: Decimal },

    #[error("{name} must be non-negative, got {amount}")]
    NegativeAmount { name: String, amount: Decimal },

    #[error("{jurisdiction} fallback filing status {status} has no bracket table")]
    InvalidFallback {
        jurisdiction: Jurisdiction,
        status: FilingStatus,
    },
}

/// Bracket schedules and deductions for one jurisdiction's income tax.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxTables {
    pub brackets: BTreeMap<FilingStatus, Vec<TaxBracket>>,

    /// Annual standard deduction by filing status. Use zero for
    /// jurisdictions without one.
    pub standard_deductions: BTreeMap<FilingStatus, Decimal>,

    /// Annual amount removed from taxable income per withholding allowance.
    #[serde(default)]
    pub allowance_deduction: Decimal,

    /// Status whose tables are used when the requested one has none.
    /// `None` makes a missing table a [`ConfigurationError`].
    #[serde(default)]
    pub fallback_status: Option<FilingStatus>,
}

/// The tables actually used for one calculation after fallback resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedIncomeTax<'a> {
    pub requested: FilingStatus,
    pub status: FilingStatus,
    pub brackets: &'a [TaxBracket],
    pub standard_deduction: Decimal,
}

impl ResolvedIncomeTax<'_> {
    pub fn used_fallback(&self) -> bool {
        self.requested != self.status
    }
}

impl IncomeTaxTables {
    /// Looks up the bracket table and standard deduction for `status`,
    /// applying the configured fallback status if there is one.
    ///
    /// # Errors
    ///
    /// * [`ConfigurationError::MissingBrackets`] when neither `status` nor
    ///   the fallback has a table.
    /// * [`ConfigurationError::MissingStandardDeduction`] when the resolved
    ///   status has no standard deduction entry.
    pub fn resolve(
        &self,
        jurisdiction: Jurisdiction,
        status: FilingStatus,
    ) -> Result<ResolvedIncomeTax<'_>, ConfigurationError> {
        let resolved_status = if self.brackets.contains_key(&status) {
            status
        } else {
            match self.fallback_status {
                Some(fallback) if self.brackets.contains_key(&fallback) => fallback,
                _ => {
                    return Err(ConfigurationError::MissingBrackets {
                        jurisdiction,
                        status,
                    });
                }
            }
        };

        let brackets = self
            .brackets
            .get(&resolved_status)
            .map(Vec::as_slice)
            .ok_or(ConfigurationError::MissingBrackets {
                jurisdiction,
                status,
            })?;

        let standard_deduction = self
            .standard_deductions
            .get(&resolved_status)
            .copied()
            .ok_or(ConfigurationError::MissingStandardDeduction {
                jurisdiction,
                status: resolved_status,
            })?;

        Ok(ResolvedIncomeTax {
            requested: status,
            status: resolved_status,
            brackets,
            standard_deduction,
        })
    }

    fn validate(
        &self,
        jurisdiction: Jurisdiction,
    ) -> Result<(), ConfigurationError> {
        for (status, brackets) in &self.brackets {
            validate_brackets(jurisdiction, *status, brackets)?;
        }
        for (status, amount) in &self.standard_deductions {
            if *amount < Decimal::ZERO {
                return Err(ConfigurationError::NegativeAmount {
                    name: format!("{jurisdiction} standard deduction ({})", status.as_str()),
                    amount: *amount,
                });
            }
        }
        if self.allowance_deduction < Decimal::ZERO {
            return Err(ConfigurationError::NegativeAmount {
                name: format!("{jurisdiction} allowance deduction"),
                amount: self.allowance_deduction,
            });
        }
        if let Some(fallback) = self.fallback_status {
            if !self.brackets.contains_key(&fallback) {
                return Err(ConfigurationError::InvalidFallback {
                    jurisdiction,
                    status: fallback,
                });
            }
        }
        Ok(())
    }
}

/// Flat-rate contribution that stops at an annual wage base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CappedContribution {
    pub rate: Decimal,
    pub wage_base: Decimal,
}

impl CappedContribution {
    fn validate(
        &self,
        name: &str,
    ) -> Result<(), ConfigurationError> {
        validate_rate(name, self.rate)?;
        if self.wage_base <= Decimal::ZERO {
            return Err(ConfigurationError::InvalidWageBase {
                name: name.to_string(),
                amount: self.wage_base,
            });
        }
        Ok(())
    }
}

/// Medicare rate plus the Additional Medicare Tax surtax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicareRates {
    pub rate: Decimal,
    pub additional_rate: Decimal,
    /// YTD wages above which `additional_rate` also applies.
    pub additional_threshold: Decimal,
}

/// Uncapped flat tax charged only to residents, e.g. a city wage tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalTax {
    pub name: String,
    pub rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederalTables {
    pub income_tax: IncomeTaxTables,
    pub social_security: CappedContribution,
    pub medicare: MedicareRates,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTables {
    /// Display name, e.g. `"NJ"`.
    pub name: String,
    pub income_tax: IncomeTaxTables,
    pub disability: CappedContribution,
    pub family_leave: CappedContribution,
    #[serde(default)]
    pub local_taxes: Vec<LocalTax>,
}

/// Every table the engine needs for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTableSet {
    pub tax_year: i32,
    pub federal: FederalTables,
    pub state: StateTables,
}

impl TaxTableSet {
    pub fn income_tax(
        &self,
        jurisdiction: Jurisdiction,
    ) -> &IncomeTaxTables {
        match jurisdiction {
            Jurisdiction::Federal => &self.federal.income_tax,
            Jurisdiction::State => &self.state.income_tax,
        }
    }

    /// Checks every invariant the engine depends on.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] found: malformed bracket
    /// tables, rates outside `[0, 1]`, non-positive wage bases, negative
    /// deductions or thresholds, or a fallback status without a table.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.federal.income_tax.validate(Jurisdiction::Federal)?;
        self.federal.social_security.validate("social security")?;
        validate_rate("medicare", self.federal.medicare.rate)?;
        validate_rate(
            "additional medicare",
            self.federal.medicare.additional_rate,
        )?;
        if self.federal.medicare.additional_threshold < Decimal::ZERO {
            return Err(ConfigurationError::NegativeAmount {
                name: "additional medicare threshold".to_string(),
                amount: self.federal.medicare.additional_threshold,
            });
        }

        self.state.income_tax.validate(Jurisdiction::State)?;
        self.state
            .disability
            .validate(&format!("{} disability", self.state.name))?;
        self.state
            .family_leave
            .validate(&format!("{} family leave", self.state.name))?;
        for local in &self.state.local_taxes {
            validate_rate(&local.name, local.rate)?;
        }
        Ok(())
    }
}

fn validate_rate(
    name: &str,
    rate: Decimal,
) -> Result<(), ConfigurationError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(ConfigurationError::InvalidRate {
            name: name.to_string(),
            rate,
        });
    }
    Ok(())
}

fn validate_brackets(
    jurisdiction: Jurisdiction,
    status: FilingStatus,
    brackets: &[TaxBracket],
) -> Result<(), ConfigurationError> {
    let first = brackets.first().ok_or(ConfigurationError::EmptyBracketTable {
        jurisdiction,
        status,
    })?;
    if first.min_income != Decimal::ZERO {
        return Err(ConfigurationError::BracketTableNotFromZero {
            jurisdiction,
            status,
            start: first.min_income,
        });
    }

    let mut previous_max: Option<Decimal> = None;
    for (index, bracket) in brackets.iter().enumerate() {
        validate_rate(
            &format!("{jurisdiction} bracket {index} ({})", status.as_str()),
            bracket.rate,
        )?;

        if index > 0 && previous_max != Some(bracket.min_income) {
            return Err(ConfigurationError::BracketsNotContiguous {
                jurisdiction,
                status,
                index,
            });
        }

        match bracket.max_income {
            Some(max) if max <= bracket.min_income => {
                return Err(ConfigurationError::InvalidBracketBounds {
                    jurisdiction,
                    status,
                    index,
                });
            }
            // An unbounded bracket anywhere but last leaves the next one
            // without a matching lower bound.
            None if index + 1 < brackets.len() => {
                return Err(ConfigurationError::BracketsNotContiguous {
                    jurisdiction,
                    status,
                    index: index + 1,
                });
            }
            _ => {}
        }
        previous_max = bracket.max_income;
    }

    if previous_max.is_some() {
        return Err(ConfigurationError::FinalBracketBounded {
            jurisdiction,
            status,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::test_support::sample_tables;

    #[test]
    fn sample_tables_are_valid() {
        assert_eq!(sample_tables().validate(), Ok(()));
    }

    #[test]
    fn resolve_returns_requested_status_when_present() {
        let tables = sample_tables();

        let resolved = tables
            .federal
            .income_tax
            .resolve(Jurisdiction::Federal, FilingStatus::Single)
            .unwrap();

        assert_eq!(resolved.status, FilingStatus::Single);
        assert_eq!(resolved.standard_deduction, dec!(15000));
        assert!(!resolved.used_fallback());
    }

    #[test]
    fn resolve_without_fallback_is_an_error() {
        let tables = sample_tables();

        let result = tables
            .federal
            .income_tax
            .resolve(Jurisdiction::Federal, FilingStatus::HeadOfHousehold);

        assert_eq!(
            result,
            Err(ConfigurationError::MissingBrackets {
                jurisdiction: Jurisdiction::Federal,
                status: FilingStatus::HeadOfHousehold,
            })
        );
    }

    #[test]
    fn resolve_uses_configured_fallback() {
        let tables = sample_tables();

        let resolved = tables
            .state
            .income_tax
            .resolve(Jurisdiction::State, FilingStatus::HeadOfHousehold)
            .unwrap();

        assert_eq!(resolved.requested, FilingStatus::HeadOfHousehold);
        assert_eq!(resolved.status, FilingStatus::Single);
        assert!(resolved.used_fallback());
    }

    #[test]
    fn resolve_reports_missing_standard_deduction() {
        let mut tables = sample_tables();
        tables
            .federal
            .income_tax
            .standard_deductions
            .remove(&FilingStatus::Single);

        let result = tables
            .federal
            .income_tax
            .resolve(Jurisdiction::Federal, FilingStatus::Single);

        assert_eq!(
            result,
            Err(ConfigurationError::MissingStandardDeduction {
                jurisdiction: Jurisdiction::Federal,
                status: FilingStatus::Single,
            })
        );
    }

    #[test]
    fn validate_rejects_gap_between_brackets() {
        let mut tables = sample_tables();
        tables.federal.income_tax.brackets.insert(
            FilingStatus::Single,
            vec![
                TaxBracket::new(dec!(0), Some(dec!(10000)), dec!(0.10)),
                TaxBracket::new(dec!(12000), None, dec!(0.12)),
            ],
        );

        assert_eq!(
            tables.validate(),
            Err(ConfigurationError::BracketsNotContiguous {
                jurisdiction: Jurisdiction::Federal,
                status: FilingStatus::Single,
                index: 1,
            })
        );
    }

    #[test]
    fn validate_rejects_bounded_final_bracket() {
        let mut tables = sample_tables();
        tables.federal.income_tax.brackets.insert(
            FilingStatus::Single,
            vec![TaxBracket::new(dec!(0), Some(dec!(10000)), dec!(0.10))],
        );

        assert_eq!(
            tables.validate(),
            Err(ConfigurationError::FinalBracketBounded {
                jurisdiction: Jurisdiction::Federal,
                status: FilingStatus::Single,
            })
        );
    }

    #[test]
    fn validate_rejects_table_not_starting_at_zero() {
        let mut tables = sample_tables();
        tables.state.income_tax.brackets.insert(
            FilingStatus::Single,
            vec![TaxBracket::new(dec!(500), None, dec!(0.02))],
        );

        assert_eq!(
            tables.validate(),
            Err(ConfigurationError::BracketTableNotFromZero {
                jurisdiction: Jurisdiction::State,
                status: FilingStatus::Single,
                start: dec!(500),
            })
        );
    }

    #[test]
    fn validate_rejects_empty_table() {
        let mut tables = sample_tables();
        tables
            .federal
            .income_tax
            .brackets
            .insert(FilingStatus::Single, Vec::new());

        assert_eq!(
            tables.validate(),
            Err(ConfigurationError::EmptyBracketTable {
                jurisdiction: Jurisdiction::Federal,
                status: FilingStatus::Single,
            })
        );
    }

    #[test]
    fn validate_rejects_rate_above_one() {
        let mut tables = sample_tables();
        tables.federal.medicare.rate = dec!(1.45);

        assert_eq!(
            tables.validate(),
            Err(ConfigurationError::InvalidRate {
                name: "medicare".to_string(),
                rate: dec!(1.45),
            })
        );
    }

    #[test]
    fn validate_rejects_zero_wage_base() {
        let mut tables = sample_tables();
        tables.federal.social_security.wage_base = dec!(0);

        assert_eq!(
            tables.validate(),
            Err(ConfigurationError::InvalidWageBase {
                name: "social security".to_string(),
                amount: dec!(0),
            })
        );
    }

    #[test]
    fn validate_rejects_fallback_without_table() {
        let mut tables = sample_tables();
        tables.federal.income_tax.fallback_status = Some(FilingStatus::HeadOfHousehold);

        assert_eq!(
            tables.validate(),
            Err(ConfigurationError::InvalidFallback {
                jurisdiction: Jurisdiction::Federal,
                status: FilingStatus::HeadOfHousehold,
            })
        );
    }
}
