use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of pay on an earning line.
///
/// Anything not recognised is kept as [`EarningKind::Other`] and paid as a
/// flat amount, the same as [`EarningKind::Salary`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EarningKind {
    Regular,
    Overtime,
    DoubleTime,
    Salary,
    Bonus,
    Other(String),
}

impl EarningKind {
    /// Hourly multiplier, or `None` for flat-amount kinds.
    pub fn hourly_multiplier(&self) -> Option<Decimal> {
        match self {
            Self::Regular => Some(Decimal::ONE),
            Self::Overtime => Some(Decimal::new(15, 1)),
            Self::DoubleTime => Some(Decimal::TWO),
            Self::Salary | Self::Bonus | Self::Other(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Regular => "Regular",
            Self::Overtime => "Overtime",
            Self::DoubleTime => "Double Time",
            Self::Salary => "Salary",
            Self::Bonus => "Bonus",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for EarningKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for EarningKind {
    fn from(value: String) -> Self {
        let normalized: String = value
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "regular" | "hourly" => Self::Regular,
            "overtime" | "ot" => Self::Overtime,
            "doubletime" | "dt" => Self::DoubleTime,
            "salary" => Self::Salary,
            "bonus" => Self::Bonus,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for EarningKind {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<EarningKind> for String {
    fn from(kind: EarningKind) -> Self {
        kind.as_str().to_string()
    }
}

/// One line of pay for the period.
///
/// For hourly kinds the amount is `rate × multiplier × hours`; for flat kinds
/// `rate` is the amount and `hours` is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningLine {
    pub kind: EarningKind,
    pub rate: Decimal,
    #[serde(default)]
    pub hours: Decimal,
}

impl EarningLine {
    pub fn hourly(
        kind: EarningKind,
        rate: Decimal,
        hours: Decimal,
    ) -> Self {
        Self { kind, rate, hours }
    }

    pub fn flat(
        kind: EarningKind,
        amount: Decimal,
    ) -> Self {
        Self {
            kind,
            rate: amount,
            hours: Decimal::ZERO,
        }
    }

    pub fn amount(&self) -> Decimal {
        match self.kind.hourly_multiplier() {
            Some(multiplier) => self.rate * multiplier * self.hours,
            None => self.rate,
        }
    }
}

/// Computed amount for one earning line, kept for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningAmount {
    pub kind: EarningKind,
    pub rate: Decimal,
    pub hours: Decimal,
    pub amount: Decimal,
}

impl From<&EarningLine> for EarningAmount {
    fn from(line: &EarningLine) -> Self {
        Self {
            kind: line.kind.clone(),
            rate: line.rate,
            hours: line.hours,
            amount: line.amount(),
        }
    }
}
