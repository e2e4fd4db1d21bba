//! Table fixtures shared by unit tests.

use std::collections::BTreeMap;

use rust_decimal_macros::dec;

use crate::models::{
    CappedContribution, FederalTables, FilingStatus, IncomeTaxTables, LocalTax, MedicareRates,
    StateTables, TaxBracket, TaxTableSet,
};

/// 2025 federal and NJ figures, trimmed to Single and MFJ.
///
/// The federal tables have no fallback; the state falls back to Single.
pub(crate) fn sample_tables() -> TaxTableSet {
    let federal_single = vec![
        TaxBracket::new(dec!(0), Some(dec!(11925)), dec!(0.10)),
        TaxBracket::new(dec!(11925), Some(dec!(48475)), dec!(0.12)),
        TaxBracket::new(dec!(48475), Some(dec!(103350)), dec!(0.22)),
        TaxBracket::new(dec!(103350), Some(dec!(197300)), dec!(0.24)),
        TaxBracket::new(dec!(197300), Some(dec!(250525)), dec!(0.32)),
        TaxBracket::new(dec!(250525), Some(dec!(626350)), dec!(0.35)),
        TaxBracket::new(dec!(626350), None, dec!(0.37)),
    ];
    let federal_joint = vec![
        TaxBracket::new(dec!(0), Some(dec!(23850)), dec!(0.10)),
        TaxBracket::new(dec!(23850), Some(dec!(96950)), dec!(0.12)),
        TaxBracket::new(dec!(96950), Some(dec!(206700)), dec!(0.22)),
        TaxBracket::new(dec!(206700), Some(dec!(394600)), dec!(0.24)),
        TaxBracket::new(dec!(394600), Some(dec!(501050)), dec!(0.32)),
        TaxBracket::new(dec!(501050), Some(dec!(751600)), dec!(0.35)),
        TaxBracket::new(dec!(751600), None, dec!(0.37)),
    ];
    let nj_single = vec![
        TaxBracket::new(dec!(0), Some(dec!(20000)), dec!(0.014)),
        TaxBracket::new(dec!(20000), Some(dec!(35000)), dec!(0.0175)),
        TaxBracket::new(dec!(35000), Some(dec!(40000)), dec!(0.035)),
        TaxBracket::new(dec!(40000), Some(dec!(75000)), dec!(0.05525)),
        TaxBracket::new(dec!(75000), Some(dec!(500000)), dec!(0.0637)),
        TaxBracket::new(dec!(500000), Some(dec!(1000000)), dec!(0.0897)),
        TaxBracket::new(dec!(1000000), None, dec!(0.1075)),
    ];
    let nj_joint = vec![
        TaxBracket::new(dec!(0), Some(dec!(20000)), dec!(0.014)),
        TaxBracket::new(dec!(20000), Some(dec!(50000)), dec!(0.0175)),
        TaxBracket::new(dec!(50000), Some(dec!(70000)), dec!(0.0245)),
        TaxBracket::new(dec!(70000), Some(dec!(80000)), dec!(0.035)),
        TaxBracket::new(dec!(80000), Some(dec!(150000)), dec!(0.05525)),
        TaxBracket::new(dec!(150000), Some(dec!(500000)), dec!(0.0637)),
        TaxBracket::new(dec!(500000), Some(dec!(1000000)), dec!(0.0897)),
        TaxBracket::new(dec!(1000000), None, dec!(0.1075)),
    ];

    TaxTableSet {
        tax_year: 2025,
        federal: FederalTables {
            income_tax: IncomeTaxTables {
                brackets: BTreeMap::from([
                    (FilingStatus::Single, federal_single),
                    (FilingStatus::MarriedFilingJointly, federal_joint),
                ]),
                standard_deductions: BTreeMap::from([
                    (FilingStatus::Single, dec!(15000)),
                    (FilingStatus::MarriedFilingJointly, dec!(30000)),
                ]),
                allowance_deduction: dec!(0),
                fallback_status: None,
            },
            social_security: CappedContribution {
                rate: dec!(0.062),
                wage_base: dec!(176100),
            },
            medicare: MedicareRates {
                rate: dec!(0.0145),
                additional_rate: dec!(0.009),
                additional_threshold: dec!(200000),
            },
        },
        state: StateTables {
            name: "NJ".to_string(),
            income_tax: IncomeTaxTables {
                brackets: BTreeMap::from([
                    (FilingStatus::Single, nj_single),
                    (FilingStatus::MarriedFilingJointly, nj_joint),
                ]),
                standard_deductions: BTreeMap::from([
                    (FilingStatus::Single, dec!(0)),
                    (FilingStatus::MarriedFilingJointly, dec!(0)),
                ]),
                allowance_deduction: dec!(1000),
                fallback_status: Some(FilingStatus::Single),
            },
            disability: CappedContribution {
                rate: dec!(0.0023),
                wage_base: dec!(165400),
            },
            family_leave: CappedContribution {
                rate: dec!(0.0033),
                wage_base: dec!(165400),
            },
            local_taxes: vec![LocalTax {
                name: "Newark".to_string(),
                rate: dec!(0.01),
            }],
        },
    }
}

/// A table set with a single flat federal bracket and no state income tax,
/// for checking arithmetic by hand.
pub(crate) fn flat_tables(
    federal_rate: rust_decimal::Decimal,
    standard_deduction: rust_decimal::Decimal,
) -> TaxTableSet {
    let mut tables = sample_tables();
    tables.federal.income_tax.brackets = BTreeMap::from([(
        FilingStatus::Single,
        vec![TaxBracket::new(dec!(0), None, federal_rate)],
    )]);
    tables.federal.income_tax.standard_deductions =
        BTreeMap::from([(FilingStatus::Single, standard_deduction)]);
    tables.state.income_tax.brackets = BTreeMap::from([(
        FilingStatus::Single,
        vec![TaxBracket::new(dec!(0), None, dec!(0))],
    )]);
    tables
}
