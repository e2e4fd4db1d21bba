use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{EarningKind, PayPeriodResult, TaxBreakdown};

/// Running year-to-date totals for one employee.
///
/// The engine never stores these. Callers persist the snapshot returned in
/// [`PayPeriodResult::ytd`] and pass it back for the next period, in pay
/// period order. A new employee starts from [`YtdAccumulators::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YtdAccumulators {
    pub gross_pay: Decimal,
    /// Wages after pre-tax deductions; the base the wage caps are measured on.
    pub taxable_gross: Decimal,
    pub pre_tax_deductions: Decimal,
    pub post_tax_deductions: Decimal,
    pub net_pay: Decimal,
    pub taxes: TaxBreakdown,
    pub earnings: BTreeMap<EarningKind, Decimal>,
}

impl YtdAccumulators {
    pub fn total_taxes(&self) -> Decimal {
        self.taxes.total()
    }

    /// Returns a new snapshot with `period`'s current amounts added.
    ///
    /// Earning kinds are matched by kind; kinds only present in `self` carry
    /// over unchanged. `period.ytd` is ignored.
    pub fn accumulate(
        &self,
        period: &PayPeriodResult,
    ) -> YtdAccumulators {
        let mut earnings = self.earnings.clone();
        for line in &period.earnings {
            *earnings.entry(line.kind.clone()).or_default() += line.amount;
        }

        YtdAccumulators {
            gross_pay: self.gross_pay + period.gross_pay,
            taxable_gross: self.taxable_gross + period.taxable_gross,
            pre_tax_deductions: self.pre_tax_deductions + period.pre_tax_deductions,
            post_tax_deductions: self.post_tax_deductions + period.post_tax_deductions,
            net_pay: self.net_pay + period.net_pay,
            taxes: self.taxes.add(&period.taxes),
            earnings,
        }
    }
}
