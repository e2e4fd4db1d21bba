use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::ConfigurationError;

/// How often an employee is paid.
///
/// | frequency     | periods per year |
/// |---------------|------------------|
/// | Weekly        | 52 |
/// | Bi-Weekly     | 26 |
/// | Semi-Monthly  | 24 |
/// | Monthly       | 12 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PayFrequency {
    Weekly,
    BiWeekly,
    SemiMonthly,
    Monthly,
}

impl PayFrequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Self::Weekly => 52,
            Self::BiWeekly => 26,
            Self::SemiMonthly => 24,
            Self::Monthly => 12,
        }
    }

    /// [`Self::periods_per_year`] as a [`Decimal`] for annualizing amounts.
    pub fn periods(&self) -> Decimal {
        Decimal::from(self.periods_per_year())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "Weekly",
            Self::BiWeekly => "Bi-Weekly",
            Self::SemiMonthly => "Semi-Monthly",
            Self::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for PayFrequency {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayFrequency {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "weekly" => Ok(Self::Weekly),
            "biweekly" => Ok(Self::BiWeekly),
            "semimonthly" => Ok(Self::SemiMonthly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(ConfigurationError::UnknownPayFrequency(s.to_string())),
        }
    }
}

impl TryFrom<String> for PayFrequency {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PayFrequency> for String {
    fn from(frequency: PayFrequency) -> Self {
        frequency.as_str().to_string()
    }
}
