use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::ConfigurationError;

/// Filing status used to select bracket tables and standard deductions.
///
/// Serialized as the short code (`S`, `MFJ`, ...); parsing also accepts the
/// spelled-out name so request files can say `Single` or
/// `MarriedFilingJointly`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FilingStatus {
    Single,
    MarriedFilingJointly,
    MarriedFilingSeparately,
    HeadOfHousehold,
    QualifyingSurvivingSpouse,
}

impl FilingStatus {
    pub const ALL: [FilingStatus; 5] = [
        Self::Single,
        Self::MarriedFilingJointly,
        Self::MarriedFilingSeparately,
        Self::HeadOfHousehold,
        Self::QualifyingSurvivingSpouse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "S",
            Self::MarriedFilingJointly => "MFJ",
            Self::MarriedFilingSeparately => "MFS",
            Self::HeadOfHousehold => "HOH",
            Self::QualifyingSurvivingSpouse => "QSS",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::MarriedFilingJointly => "Married Filing Jointly",
            Self::MarriedFilingSeparately => "Married Filing Separately",
            Self::HeadOfHousehold => "Head of Household",
            Self::QualifyingSurvivingSpouse => "Qualifying Surviving Spouse",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "s" | "single" => Some(Self::Single),
            "mfj" | "marriedfilingjointly" | "married" => Some(Self::MarriedFilingJointly),
            "mfs" | "marriedfilingseparately" => Some(Self::MarriedFilingSeparately),
            "hoh" | "headofhousehold" => Some(Self::HeadOfHousehold),
            "qss" | "qualifyingsurvivingspouse" | "qualifyingwidow" => {
                Some(Self::QualifyingSurvivingSpouse)
            }
            _ => None,
        }
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FilingStatus {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ConfigurationError::UnknownFilingStatus(s.to_string()))
    }
}

impl TryFrom<String> for FilingStatus {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FilingStatus> for String {
    fn from(status: FilingStatus) -> Self {
        status.as_str().to_string()
    }
}
