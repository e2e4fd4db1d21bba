use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether a deduction comes out before or after taxes are figured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeductionCategory {
    #[serde(alias = "pre_tax", alias = "pretax", alias = "Pre-Tax")]
    PreTax,
    #[serde(alias = "post_tax", alias = "posttax", alias = "Post-Tax")]
    PostTax,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionLine {
    pub description: String,
    pub amount: Decimal,
    pub category: DeductionCategory,
}

impl DeductionLine {
    pub fn pre_tax(
        description: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            category: DeductionCategory::PreTax,
        }
    }

    pub fn post_tax(
        description: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            category: DeductionCategory::PostTax,
        }
    }
}

/// Sums deduction amounts into `(pre_tax, post_tax)` totals.
pub fn deduction_totals(deductions: &[DeductionLine]) -> (Decimal, Decimal) {
    deductions
        .iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(pre, post), line| {
            match line.category {
                DeductionCategory::PreTax => (pre + line.amount, post),
                DeductionCategory::PostTax => (pre, post + line.amount),
            }
        })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn totals_split_by_category() {
        let deductions = vec![
            DeductionLine::pre_tax("401(k)", dec!(80)),
            DeductionLine::pre_tax("Health", dec!(45.50)),
            DeductionLine::post_tax("Roth IRA", dec!(25)),
        ];

        assert_eq!(deduction_totals(&deductions), (dec!(125.50), dec!(25)));
    }

    #[test]
    fn totals_of_nothing_are_zero() {
        assert_eq!(deduction_totals(&[]), (dec!(0), dec!(0)));
    }
}
