//! Plain-text paystub.

use std::fmt;

use paystub_core::calculations::common::round_half_up;
use paystub_core::{DeductionCategory, EarningAmount, PayPeriodResult, ValidationWarning};
use rust_decimal::Decimal;

use crate::request::PaystubRequest;

const LABEL: usize = 24;
const NUMBER: usize = 9;
const MONEY: usize = 14;

/// Formats an amount as `1,234.56`.
pub fn format_money(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let fixed = cents(rounded.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{fraction}")
}

/// Rounds half-up and always shows two decimal places.
fn cents(value: Decimal) -> String {
    format!("{:.2}", round_half_up(value))
}

/// Rate and hours columns; blank for flat amounts.
fn rate_and_hours(line: &EarningAmount) -> (String, String) {
    if line.kind.hourly_multiplier().is_some() {
        (cents(line.rate), cents(line.hours))
    } else {
        (String::new(), String::new())
    }
}

pub fn describe_warning(warning: &ValidationWarning) -> String {
    match warning {
        ValidationWarning::PreTaxDeductionsExceedGross {
            gross_pay,
            pre_tax_deductions,
        } => format!(
            "pre-tax deductions ({}) exceed gross pay ({}); taxable wages set to zero",
            format_money(*pre_tax_deductions),
            format_money(*gross_pay)
        ),
        ValidationWarning::NegativeNetPay { net_pay } => {
            format!("net pay is negative ({})", format_money(*net_pay))
        }
        ValidationWarning::FilingStatusFallback {
            jurisdiction,
            requested,
            used,
        } => format!("no {jurisdiction} table for {requested}; {used} table used instead"),
    }
}

/// A paystub ready to print. Amounts are rounded to cents on construction.
pub struct PaystubReport<'a> {
    request: &'a PaystubRequest,
    result: PayPeriodResult,
    state_name: &'a str,
}

impl<'a> PaystubReport<'a> {
    pub fn new(
        request: &'a PaystubRequest,
        result: &PayPeriodResult,
        state_name: &'a str,
    ) -> Self {
        Self {
            request,
            result: result.rounded(),
            state_name,
        }
    }
}

fn money_row(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    current: Decimal,
    ytd: Option<Decimal>,
) -> fmt::Result {
    let ytd = ytd.map(format_money).unwrap_or_default();
    writeln!(
        f,
        "{label:<LABEL$}{:>NUMBER$}{:>NUMBER$}{:>MONEY$}{ytd:>MONEY$}",
        "",
        "",
        format_money(current)
    )
}

fn heading(
    f: &mut fmt::Formatter<'_>,
    title: &str,
) -> fmt::Result {
    writeln!(
        f,
        "{title:<LABEL$}{:>NUMBER$}{:>NUMBER$}{:>MONEY$}{:>MONEY$}",
        "", "", "Current", "YTD"
    )
}

impl fmt::Display for PaystubReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let request = self.request;
        let result = &self.result;
        let ytd = &result.ytd;
        let period = &request.period;

        writeln!(f, "{}", request.company_name)?;
        writeln!(
            f,
            "{:<40}Pay date {}",
            request.employee_name, request.pay_date
        )?;
        writeln!(f, "{}, {}", period.pay_frequency, period.filing_status)?;
        writeln!(f)?;

        writeln!(
            f,
            "{:<LABEL$}{:>NUMBER$}{:>NUMBER$}{:>MONEY$}{:>MONEY$}",
            "Earnings", "Rate", "Hours", "Current", "YTD"
        )?;
        for line in &result.earnings {
            let (rate, hours) = rate_and_hours(line);
            let earned_ytd = ytd
                .earnings
                .get(&line.kind)
                .copied()
                .map(format_money)
                .unwrap_or_default();
            writeln!(
                f,
                "{:<LABEL$}{rate:>NUMBER$}{hours:>NUMBER$}{:>MONEY$}{earned_ytd:>MONEY$}",
                line.kind.as_str(),
                format_money(line.amount)
            )?;
        }
        money_row(f, "Gross pay", result.gross_pay, Some(ytd.gross_pay))?;
        writeln!(f)?;

        if !period.deductions.is_empty() {
            heading(f, "Deductions")?;
            for line in &period.deductions {
                let suffix = match line.category {
                    DeductionCategory::PreTax => "pre-tax",
                    DeductionCategory::PostTax => "post-tax",
                };
                money_row(
                    f,
                    &format!("{} ({suffix})", line.description),
                    line.amount,
                    None,
                )?;
            }
            money_row(
                f,
                "Pre-tax total",
                result.pre_tax_deductions,
                Some(ytd.pre_tax_deductions),
            )?;
            money_row(
                f,
                "Post-tax total",
                result.post_tax_deductions,
                Some(ytd.post_tax_deductions),
            )?;
            writeln!(f)?;
        }

        let taxes = &result.taxes;
        let ytd_taxes = &ytd.taxes;
        heading(f, "Taxes")?;
        money_row(
            f,
            "Federal income tax",
            taxes.federal_income,
            Some(ytd_taxes.federal_income),
        )?;
        money_row(
            f,
            "Social Security",
            taxes.social_security,
            Some(ytd_taxes.social_security),
        )?;
        money_row(f, "Medicare", taxes.medicare, Some(ytd_taxes.medicare))?;
        if !ytd_taxes.additional_medicare.is_zero() {
            money_row(
                f,
                "Additional Medicare",
                taxes.additional_medicare,
                Some(ytd_taxes.additional_medicare),
            )?;
        }
        money_row(
            f,
            &format!("{} income tax", self.state_name),
            taxes.state_income,
            Some(ytd_taxes.state_income),
        )?;
        money_row(
            f,
            &format!("{} disability", self.state_name),
            taxes.state_disability,
            Some(ytd_taxes.state_disability),
        )?;
        money_row(
            f,
            &format!("{} family leave", self.state_name),
            taxes.state_family_leave,
            Some(ytd_taxes.state_family_leave),
        )?;
        for (name, amount) in &ytd_taxes.local {
            let current = taxes.local.get(name).copied().unwrap_or_default();
            money_row(f, name, current, Some(*amount))?;
        }
        money_row(
            f,
            "Total taxes",
            result.total_taxes,
            Some(ytd.total_taxes()),
        )?;
        writeln!(f)?;

        money_row(f, "Net pay", result.net_pay, Some(ytd.net_pay))?;

        if !result.warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "Warnings")?;
            for warning in &result.warnings {
                writeln!(f, "  - {}", describe_warning(warning))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use paystub_core::{EarningKind, FilingStatus, Jurisdiction};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn format_money_groups_thousands() {
        assert_eq!(format_money(dec!(0)), "0.00");
        assert_eq!(format_money(dec!(999.5)), "999.50");
        assert_eq!(format_money(dec!(1000)), "1,000.00");
        assert_eq!(format_money(dec!(1234567.891)), "1,234,567.89");
        assert_eq!(format_money(dec!(-50)), "-50.00");
    }

    #[test]
    fn format_money_rounds_half_cents_up() {
        assert_eq!(format_money(dec!(0.005)), "0.01");
        assert_eq!(format_money(dec!(-2.125)), "-2.13");
        assert_eq!(format_money(dec!(-0.001)), "0.00");
    }

    #[test]
    fn hourly_columns_round_like_money() {
        let line = EarningAmount {
            kind: EarningKind::Overtime,
            rate: dec!(18.125),
            hours: dec!(2.335),
            amount: dec!(63.48046875),
        };

        assert_eq!(
            rate_and_hours(&line),
            ("18.13".to_string(), "2.34".to_string())
        );
    }

    #[test]
    fn flat_earnings_leave_rate_and_hours_blank() {
        let line = EarningAmount {
            kind: EarningKind::Bonus,
            rate: dec!(500),
            hours: dec!(0),
            amount: dec!(500),
        };

        assert_eq!(rate_and_hours(&line), (String::new(), String::new()));
    }

    #[test]
    fn warnings_read_as_sentences() {
        assert_eq!(
            describe_warning(&ValidationWarning::NegativeNetPay { net_pay: dec!(-50) }),
            "net pay is negative (-50.00)"
        );
        assert_eq!(
            describe_warning(&ValidationWarning::FilingStatusFallback {
                jurisdiction: Jurisdiction::State,
                requested: FilingStatus::HeadOfHousehold,
                used: FilingStatus::Single,
            }),
            "no state table for Head of Household; Single table used instead"
        );
    }
}
