use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::round_half_up;
use crate::models::PayPeriodResult;

/// What the payment/notification backend needs to send a finished stub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaystubSummary {
    pub employee_name: String,
    pub company_name: String,
    pub pay_date: NaiveDate,
    /// Net pay rounded to cents.
    pub net_pay: Decimal,
}

impl PaystubSummary {
    pub fn from_result(
        employee_name: impl Into<String>,
        company_name: impl Into<String>,
        pay_date: NaiveDate,
        result: &PayPeriodResult,
    ) -> Self {
        Self {
            employee_name: employee_name.into(),
            company_name: company_name.into(),
            pay_date,
            net_pay: round_half_up(result.net_pay),
        }
    }
}
