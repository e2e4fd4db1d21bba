mod deduction;
mod earning;
mod filing_status;
mod pay_frequency;
mod pay_period;
mod paystub_summary;
mod tax_bracket;
mod tax_table_set;
mod ytd;

#[cfg(test)]
pub(crate) mod test_support;

pub use deduction::{DeductionCategory, DeductionLine, deduction_totals};
pub use earning::{EarningAmount, EarningKind, EarningLine};
pub use filing_status::FilingStatus;
pub use pay_frequency::PayFrequency;
pub use pay_period::{PayPeriodInput, PayPeriodResult, TaxBreakdown, ValidationWarning};
pub use paystub_summary::PaystubSummary;
pub use tax_bracket::TaxBracket;
pub use tax_table_set::{
    CappedContribution, ConfigurationError, FederalTables, IncomeTaxTables, Jurisdiction,
    LocalTax, MedicareRates, ResolvedIncomeTax, StateTables, TaxTableSet,
};
pub use ytd::YtdAccumulators;
