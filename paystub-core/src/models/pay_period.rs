use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::round_half_up;
use crate::models::{
    DeductionLine, EarningAmount, EarningLine, FilingStatus, Jurisdiction, PayFrequency,
    YtdAccumulators,
};

/// Everything the engine needs to know about one pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriodInput {
    pub earnings: Vec<EarningLine>,
    #[serde(default)]
    pub deductions: Vec<DeductionLine>,
    pub pay_frequency: PayFrequency,
    pub filing_status: FilingStatus,
    #[serde(default)]
    pub allowances: u32,
    /// Whether the employee lives where the state's local taxes apply.
    #[serde(default)]
    pub local_resident: bool,
}

/// Withholding for one period, or accumulated over the year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxBreakdown {
    pub federal_income: Decimal,
    pub social_security: Decimal,
    pub medicare: Decimal,
    pub additional_medicare: Decimal,
    pub state_income: Decimal,
    pub state_disability: Decimal,
    pub state_family_leave: Decimal,
    /// Local taxes keyed by name.
    pub local: BTreeMap<String, Decimal>,
}

impl TaxBreakdown {
    pub fn total(&self) -> Decimal {
        self.federal_income
            + self.social_security
            + self.medicare
            + self.additional_medicare
            + self.state_income
            + self.state_disability
            + self.state_family_leave
            + self.local.values().copied().sum::<Decimal>()
    }

    /// Field-by-field sum; local taxes are merged by name.
    pub fn add(
        &self,
        other: &TaxBreakdown,
    ) -> TaxBreakdown {
        let mut local = self.local.clone();
        for (name, amount) in &other.local {
            *local.entry(name.clone()).or_default() += *amount;
        }

        TaxBreakdown {
            federal_income: self.federal_income + other.federal_income,
            social_security: self.social_security + other.social_security,
            medicare: self.medicare + other.medicare,
            additional_medicare: self.additional_medicare + other.additional_medicare,
            state_income: self.state_income + other.state_income,
            state_disability: self.state_disability + other.state_disability,
            state_family_leave: self.state_family_leave + other.state_family_leave,
            local,
        }
    }

    fn rounded(&self) -> TaxBreakdown {
        TaxBreakdown {
            federal_income: round_half_up(self.federal_income),
            social_security: round_half_up(self.social_security),
            medicare: round_half_up(self.medicare),
            additional_medicare: round_half_up(self.additional_medicare),
            state_income: round_half_up(self.state_income),
            state_disability: round_half_up(self.state_disability),
            state_family_leave: round_half_up(self.state_family_leave),
            local: self
                .local
                .iter()
                .map(|(name, amount)| (name.clone(), round_half_up(*amount)))
                .collect(),
        }
    }
}

/// Non-fatal conditions noticed while computing a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationWarning {
    /// Pre-tax deductions were larger than gross pay; taxable gross was
    /// clamped to zero.
    PreTaxDeductionsExceedGross {
        gross_pay: Decimal,
        pre_tax_deductions: Decimal,
    },

    /// Withholding and deductions exceed gross pay.
    NegativeNetPay { net_pay: Decimal },

    /// The requested filing status had no table and the jurisdiction's
    /// configured fallback was used.
    FilingStatusFallback {
        jurisdiction: Jurisdiction,
        requested: FilingStatus,
        used: FilingStatus,
    },
}

/// Output of one calculation.
///
/// Amounts are unrounded so the breakdown can be audited; use
/// [`PayPeriodResult::rounded`] for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriodResult {
    pub earnings: Vec<EarningAmount>,
    pub gross_pay: Decimal,
    pub pre_tax_deductions: Decimal,
    pub post_tax_deductions: Decimal,
    pub taxable_gross: Decimal,
    pub taxes: TaxBreakdown,
    pub total_taxes: Decimal,
    pub net_pay: Decimal,
    pub warnings: Vec<ValidationWarning>,
    /// Year-to-date totals including this period.
    pub ytd: YtdAccumulators,
}

impl PayPeriodResult {
    /// Copy of this result with every monetary amount rounded half-up to
    /// cents. Rates and hours are left as entered.
    pub fn rounded(&self) -> PayPeriodResult {
        PayPeriodResult {
            earnings: self
                .earnings
                .iter()
                .map(|line| EarningAmount {
                    amount: round_half_up(line.amount),
                    ..line.clone()
                })
                .collect(),
            gross_pay: round_half_up(self.gross_pay),
            pre_tax_deductions: round_half_up(self.pre_tax_deductions),
            post_tax_deductions: round_half_up(self.post_tax_deductions),
            taxable_gross: round_half_up(self.taxable_gross),
            taxes: self.taxes.rounded(),
            total_taxes: round_half_up(self.total_taxes),
            net_pay: round_half_up(self.net_pay),
            warnings: self.warnings.clone(),
            ytd: YtdAccumulators {
                gross_pay: round_half_up(self.ytd.gross_pay),
                taxable_gross: round_half_up(self.ytd.taxable_gross),
                pre_tax_deductions: round_half_up(self.ytd.pre_tax_deductions),
                post_tax_deductions: round_half_up(self.ytd.post_tax_deductions),
                net_pay: round_half_up(self.ytd.net_pay),
                taxes: self.ytd.taxes.rounded(),
                earnings: self
                    .ytd
                    .earnings
                    .iter()
                    .map(|(kind, amount)| (kind.clone(), round_half_up(*amount)))
                    .collect(),
            },
        }
    }
}
