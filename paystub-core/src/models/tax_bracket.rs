use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One slice of a marginal-rate schedule.
///
/// Income between `min_income` and `max_income` is taxed at `rate`.
/// `max_income` is `None` for the top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        min_income: Decimal,
        max_income: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        Self {
            min_income,
            max_income,
            rate,
        }
    }

    /// Portion of `income` that falls inside this bracket.
    pub fn taxable_slice(
        &self,
        income: Decimal,
    ) -> Decimal {
        if income <= self.min_income {
            return Decimal::ZERO;
        }
        let top = match self.max_income {
            Some(max) => income.min(max),
            None => income,
        };
        top - self.min_income
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn slice_is_zero_below_bracket() {
        let bracket = TaxBracket::new(dec!(10000), Some(dec!(20000)), dec!(0.12));

        assert_eq!(bracket.taxable_slice(dec!(9000)), dec!(0));
        assert_eq!(bracket.taxable_slice(dec!(10000)), dec!(0));
    }

    #[test]
    fn slice_is_partial_inside_bracket() {
        let bracket = TaxBracket::new(dec!(10000), Some(dec!(20000)), dec!(0.12));

        assert_eq!(bracket.taxable_slice(dec!(12500)), dec!(2500));
    }

    #[test]
    fn slice_is_capped_at_bracket_width() {
        let bracket = TaxBracket::new(dec!(10000), Some(dec!(20000)), dec!(0.12));

        assert_eq!(bracket.taxable_slice(dec!(50000)), dec!(10000));
    }

    #[test]
    fn unbounded_bracket_takes_everything_above_floor() {
        let bracket = TaxBracket::new(dec!(626350), None, dec!(0.37));

        assert_eq!(bracket.taxable_slice(dec!(1000000)), dec!(373650));
    }
}
