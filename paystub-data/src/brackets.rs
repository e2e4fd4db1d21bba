use std::collections::BTreeMap;
use std::io::Read;

use paystub_core::{FilingStatus, Jurisdiction, TaxBracket};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::TaxTableLoaderError;

/// A single record from the tax brackets CSV file.
///
/// - `jurisdiction`: `federal` or `state`
/// - `schedule`: the published schedule code (federal X, Y-1, Y-2, Z; state A, B)
/// - `min_income`: the lower bound of this bracket
/// - `max_income`: the upper bound (empty for the unbounded top bracket)
/// - `rate`: the marginal rate as a decimal (e.g., 0.10 for 10%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub jurisdiction: String,
    pub schedule: String,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

pub(crate) fn parse_jurisdiction(value: &str) -> Result<Jurisdiction, TaxTableLoaderError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "federal" => Ok(Jurisdiction::Federal),
        "state" => Ok(Jurisdiction::State),
        _ => Err(TaxTableLoaderError::InvalidJurisdiction(value.to_string())),
    }
}

/// Maps schedule codes to the filing statuses that share them.
///
/// Federal:
/// - Schedule X → Single
/// - Schedule Y-1 → Married Filing Jointly and Qualifying Surviving Spouse
/// - Schedule Y-2 → Married Filing Separately
/// - Schedule Z → Head of Household
///
/// New Jersey:
/// - Schedule A → Single and Married Filing Separately
/// - Schedule B → Married Filing Jointly, Head of Household and Qualifying
///   Surviving Spouse
pub(crate) fn schedule_statuses(
    jurisdiction: Jurisdiction,
    schedule: &str,
) -> Result<&'static [FilingStatus], TaxTableLoaderError> {
    use FilingStatus::*;

    match (jurisdiction, schedule.trim()) {
        (Jurisdiction::Federal, "X") => Ok(&[Single]),
        (Jurisdiction::Federal, "Y-1") => Ok(&[MarriedFilingJointly, QualifyingSurvivingSpouse]),
        (Jurisdiction::Federal, "Y-2") => Ok(&[MarriedFilingSeparately]),
        (Jurisdiction::Federal, "Z") => Ok(&[HeadOfHousehold]),
        (Jurisdiction::State, "A") => Ok(&[Single, MarriedFilingSeparately]),
        (Jurisdiction::State, "B") => Ok(&[
            MarriedFilingJointly,
            HeadOfHousehold,
            QualifyingSurvivingSpouse,
        ]),
        _ => Err(TaxTableLoaderError::InvalidSchedule {
            jurisdiction,
            schedule: schedule.to_string(),
        }),
    }
}

/// Bracket tables keyed by filing status, for both jurisdictions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BracketTables {
    pub federal: BTreeMap<FilingStatus, Vec<TaxBracket>>,
    pub state: BTreeMap<FilingStatus, Vec<TaxBracket>>,
}

/// Loader for bracket data from CSV.
pub struct BracketTableLoader;

impl BracketTableLoader {
    /// Parse bracket records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a string slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, TaxTableLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Groups records into per-status bracket tables.
    ///
    /// A schedule shared by several statuses is copied to each of them.
    /// Brackets within a table are ordered by `min_income`; contiguity is
    /// left to [`paystub_core::TaxTableSet::validate`].
    pub fn group(records: &[BracketRecord]) -> Result<BracketTables, TaxTableLoaderError> {
        let mut tables = BracketTables::default();

        for record in records {
            let jurisdiction = parse_jurisdiction(&record.jurisdiction)?;
            let statuses = schedule_statuses(jurisdiction, &record.schedule)?;
            let target = match jurisdiction {
                Jurisdiction::Federal => &mut tables.federal,
                Jurisdiction::State => &mut tables.state,
            };

            for status in statuses {
                target.entry(*status).or_default().push(TaxBracket::new(
                    record.min_income,
                    record.max_income,
                    record.rate,
                ));
            }
        }

        for brackets in tables.federal.values_mut().chain(tables.state.values_mut()) {
            brackets.sort_by(|a, b| a.min_income.cmp(&b.min_income));
        }

        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const HEADER: &str = "jurisdiction,schedule,min_income,max_income,rate\n";

    const BUNDLED_CSV: &str = include_str!("../data/2025/brackets.csv");

    #[test]
    fn parse_single_record() {
        let csv = format!("{HEADER}federal,X,0,11925,0.10");

        let records = BracketTableLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(
            records,
            vec![BracketRecord {
                jurisdiction: "federal".to_string(),
                schedule: "X".to_string(),
                min_income: dec!(0),
                max_income: Some(dec!(11925)),
                rate: dec!(0.10),
            }]
        );
    }

    #[test]
    fn parse_unbounded_max_income() {
        let csv = format!("{HEADER}federal,X,626350,,0.37");

        let records = BracketTableLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].max_income, None);
        assert_eq!(records[0].min_income, dec!(626350));
    }

    #[test]
    fn parse_missing_column_fails() {
        let csv = "jurisdiction,schedule,min_income\nfederal,X,0";

        let err = BracketTableLoader::parse(csv.as_bytes()).expect_err("Should fail");

        let TaxTableLoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {err:?}");
        };
        assert!(msg.contains("missing field"), "got: {msg}");
    }

    #[test]
    fn parse_bad_decimal_fails() {
        let csv = format!("{HEADER}federal,X,abc,11925,0.10");

        let err = BracketTableLoader::parse(csv.as_bytes()).expect_err("Should fail");

        assert!(matches!(err, TaxTableLoaderError::CsvParse(_)));
    }

    #[test]
    fn parse_empty_csv() {
        let records = BracketTableLoader::parse(HEADER.as_bytes()).expect("Failed to parse CSV");

        assert!(records.is_empty());
    }

    #[test]
    fn federal_schedules_map_to_statuses() {
        use FilingStatus::*;

        let federal = |s| schedule_statuses(Jurisdiction::Federal, s).unwrap().to_vec();

        assert_eq!(federal("X"), vec![Single]);
        assert_eq!(
            federal("Y-1"),
            vec![MarriedFilingJointly, QualifyingSurvivingSpouse]
        );
        assert_eq!(federal("Y-2"), vec![MarriedFilingSeparately]);
        assert_eq!(federal("Z"), vec![HeadOfHousehold]);
    }

    #[test]
    fn state_schedules_map_to_statuses() {
        use FilingStatus::*;

        let state = |s| schedule_statuses(Jurisdiction::State, s).unwrap().to_vec();

        assert_eq!(state("A"), vec![Single, MarriedFilingSeparately]);
        assert_eq!(
            state("B"),
            vec![MarriedFilingJointly, HeadOfHousehold, QualifyingSurvivingSpouse]
        );
    }

    #[test]
    fn schedule_from_other_jurisdiction_is_rejected() {
        let result = schedule_statuses(Jurisdiction::State, "X");

        match result {
            Err(TaxTableLoaderError::InvalidSchedule {
                jurisdiction,
                schedule,
            }) => {
                assert_eq!(jurisdiction, Jurisdiction::State);
                assert_eq!(schedule, "X");
            }
            other => panic!("expected InvalidSchedule, got {other:?}"),
        }
    }

    #[test]
    fn unknown_jurisdiction_is_rejected() {
        let csv = format!("{HEADER}county,X,0,,0.01");
        let records = BracketTableLoader::parse(csv.as_bytes()).unwrap();

        let result = BracketTableLoader::group(&records);

        assert!(matches!(
            result,
            Err(TaxTableLoaderError::InvalidJurisdiction(name)) if name == "county"
        ));
    }

    #[test]
    fn group_bundled_data_fills_every_status() {
        let records = BracketTableLoader::parse(BUNDLED_CSV.as_bytes()).unwrap();

        let tables = BracketTableLoader::group(&records).unwrap();

        for status in FilingStatus::ALL {
            assert_eq!(tables.federal[&status].len(), 7, "federal {status}");
            assert!(tables.state.contains_key(&status), "state {status}");
        }
        assert_eq!(
            tables.federal[&FilingStatus::QualifyingSurvivingSpouse],
            tables.federal[&FilingStatus::MarriedFilingJointly]
        );
        assert_eq!(tables.state[&FilingStatus::Single].len(), 7);
        assert_eq!(tables.state[&FilingStatus::HeadOfHousehold].len(), 8);
    }

    #[test]
    fn group_orders_brackets_by_lower_bound() {
        let csv = format!("{HEADER}federal,X,11925,,0.12\nfederal,X,0,11925,0.10");
        let records = BracketTableLoader::parse(csv.as_bytes()).unwrap();

        let tables = BracketTableLoader::group(&records).unwrap();

        let single = &tables.federal[&FilingStatus::Single];
        assert_eq!(single[0].min_income, dec!(0));
        assert_eq!(single[1].min_income, dec!(11925));
    }
}
