//! End-to-end payroll runs against the bundled 2025 federal and NJ tables.

use std::path::Path;

use paystub_core::calculations::common::round_half_up;
use paystub_core::source::SourceConfig;
use paystub_core::{
    DeductionLine, EarningKind, EarningLine, FilingStatus, PayFrequency, PayPeriodInput,
    PayrollEngine, SharedTaxTables, TaxTableSet, YtdAccumulators,
};
use paystub_data::{BundledTaxTableSource, default_registry};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

async fn bundled_tables() -> std::sync::Arc<TaxTableSet> {
    SharedTaxTables::new(Box::new(BundledTaxTableSource))
        .get()
        .await
        .expect("Failed to load bundled tables")
}

fn salaried(
    amount: Decimal,
    pay_frequency: PayFrequency,
    filing_status: FilingStatus,
) -> PayPeriodInput {
    PayPeriodInput {
        earnings: vec![EarningLine::flat(EarningKind::Salary, amount)],
        deductions: Vec::new(),
        pay_frequency,
        filing_status,
        allowances: 0,
        local_resident: false,
    }
}

#[tokio::test]
async fn test_weekly_single_paystub() {
    let tables = bundled_tables().await;
    let engine = PayrollEngine::new(&tables).expect("Bundled tables should validate");

    let result = engine
        .calculate(
            &salaried(dec!(1000), PayFrequency::Weekly, FilingStatus::Single),
            &YtdAccumulators::default(),
        )
        .expect("Calculation failed")
        .rounded();

    // 52000 - 15000 = 37000; 1192.50 + 25075 × 12% = 4201.50 a year
    assert_eq!(result.taxes.federal_income, dec!(80.80));
    // 280 + 262.50 + 175 + 663 = 1380.50 a year
    assert_eq!(result.taxes.state_income, dec!(26.55));
    assert_eq!(result.taxes.social_security, dec!(62.00));
    assert_eq!(result.taxes.medicare, dec!(14.50));
    assert_eq!(result.taxes.state_disability, dec!(2.30));
    assert_eq!(result.taxes.state_family_leave, dec!(3.30));
    assert_eq!(result.total_taxes, dec!(189.45));
    assert_eq!(result.net_pay, dec!(810.55));
    assert!(result.warnings.is_empty());
}

#[tokio::test]
async fn test_nj_allowances_and_pre_tax_deductions() {
    let tables = bundled_tables().await;
    let engine = PayrollEngine::new(&tables).unwrap();
    let mut input = salaried(dec!(2000), PayFrequency::BiWeekly, FilingStatus::Single);
    input.deductions = vec![
        DeductionLine::pre_tax("401(k)", dec!(200)),
        DeductionLine::post_tax("Roth IRA", dec!(50)),
    ];
    input.allowances = 1;

    let result = engine
        .calculate(&input, &YtdAccumulators::default())
        .unwrap();

    assert_eq!(result.taxable_gross, dec!(1800));
    // 46800 - 1000 allowance = 45800:
    // 280 + 262.50 + 175 + 5800 × 5.525% = 1037.95 a year
    assert_eq!(round_half_up(result.taxes.state_income), dec!(39.92));
    assert_eq!(
        result.net_pay,
        dec!(2000) - result.total_taxes - dec!(200) - dec!(50)
    );
}

#[tokio::test]
async fn test_full_year_high_earner_hits_every_cap() {
    let tables = bundled_tables().await;
    let engine = PayrollEngine::new(&tables).unwrap();
    let input = salaried(
        dec!(12500),
        PayFrequency::SemiMonthly,
        FilingStatus::MarriedFilingJointly,
    );

    let mut ytd = YtdAccumulators::default();
    for _ in 0..24 {
        ytd = engine.calculate(&input, &ytd).unwrap().ytd;
    }

    assert_eq!(ytd.gross_pay, dec!(300000));
    assert_eq!(ytd.taxes.social_security, dec!(10918.200));
    assert_eq!(ytd.taxes.medicare, dec!(4350.0000));
    assert_eq!(ytd.taxes.additional_medicare, dec!(900.000));
    assert_eq!(ytd.taxes.state_disability, dec!(380.4200));
    assert_eq!(ytd.taxes.state_family_leave, dec!(545.8200));
}

#[tokio::test]
async fn test_registry_sources_agree() {
    let registry = default_registry();
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/2025");

    let bundled = registry
        .open(&SourceConfig::default())
        .unwrap()
        .get()
        .await
        .unwrap();
    let files = registry
        .open(&SourceConfig::at("files", dir))
        .unwrap()
        .get()
        .await
        .unwrap();

    assert_eq!(bundled, files);
}

#[tokio::test]
async fn test_employees_computed_in_parallel_share_tables() {
    let tables = bundled_tables().await;
    let engine = PayrollEngine::new(&tables).unwrap();
    let statuses = FilingStatus::ALL;

    let parallel: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = statuses
            .iter()
            .map(|status| {
                scope.spawn(move || {
                    engine
                        .calculate(
                            &salaried(dec!(3000), PayFrequency::Monthly, *status),
                            &YtdAccumulators::default(),
                        )
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (status, result) in statuses.iter().zip(parallel) {
        let sequential = engine
            .calculate(
                &salaried(dec!(3000), PayFrequency::Monthly, *status),
                &YtdAccumulators::default(),
            )
            .unwrap();
        assert_eq!(result, sequential, "{status}");
    }
}
