//! Shared arithmetic for the payroll calculations.
//!
//! Everything here works on [`Decimal`] so repeated additions across a
//! year of pay periods never drift.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to cents, with exact halves rounded away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use paystub_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(51.153846)), dec!(51.15));
/// assert_eq!(round_half_up(dec!(11.605)), dec!(11.61));
/// assert_eq!(round_half_up(dec!(-3.125)), dec!(-3.13));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Floors a value at zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use paystub_core::calculations::common::non_negative;
///
/// assert_eq!(non_negative(dec!(-12.50)), dec!(0));
/// assert_eq!(non_negative(dec!(12.50)), dec!(12.50));
/// ```
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Converts a per-period amount to an annual amount.
pub fn annualize(
    per_period: Decimal,
    periods_per_year: Decimal,
) -> Decimal {
    per_period * periods_per_year
}

/// Converts an annual amount back to a per-period amount.
///
/// `periods_per_year` comes from a [`crate::models::PayFrequency`] and is
/// never zero.
pub fn deannualize(
    annual: Decimal,
    periods_per_year: Decimal,
) -> Decimal {
    annual / periods_per_year
}
