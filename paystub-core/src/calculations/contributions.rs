//! Flat-rate payroll contributions measured against year-to-date wages.
//!
//! Social Security, state disability and family leave stop once YTD wages
//! reach a wage base; the Additional Medicare Tax starts once YTD wages pass
//! a threshold. In both cases only the part of this period's wages on the
//! taxed side of the line is charged.

use rust_decimal::Decimal;

use crate::calculations::common::non_negative;
use crate::models::{CappedContribution, MedicareRates};

/// Part of `current` wages still below `wage_base` given `ytd` wages
/// already paid this year.
pub fn wages_below_cap(
    current: Decimal,
    ytd: Decimal,
    wage_base: Decimal,
) -> Decimal {
    let remaining = non_negative(wage_base - ytd);
    non_negative(current).min(remaining)
}

/// Part of `current` wages that lands above `threshold` this period.
pub fn wages_above_threshold(
    current: Decimal,
    ytd: Decimal,
    threshold: Decimal,
) -> Decimal {
    non_negative(ytd + current - threshold) - non_negative(ytd - threshold)
}

/// Contribution on this period's wages, stopping at the wage base.
pub fn capped_contribution(
    current: Decimal,
    ytd: Decimal,
    contribution: &CappedContribution,
) -> Decimal {
    wages_below_cap(current, ytd, contribution.wage_base) * contribution.rate
}

/// Regular Medicare and the Additional Medicare surtax for one period.
///
/// Returns `(medicare, additional_medicare)`.
pub fn medicare(
    current: Decimal,
    ytd: Decimal,
    rates: &MedicareRates,
) -> (Decimal, Decimal) {
    let base = non_negative(current) * rates.rate;
    let surtax =
        wages_above_threshold(current, ytd, rates.additional_threshold) * rates.additional_rate;
    (base, surtax)
}
