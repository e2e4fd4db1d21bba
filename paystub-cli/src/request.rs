//! Pay-period request files.
//!
//! ## TOML Format
//!
//! | Key                        | Required | Type    | Notes                                   |
//! |----------------------------|----------|---------|-----------------------------------------|
//! | `employee_name`            | yes      | string  |                                         |
//! | `company_name`             | yes      | string  |                                         |
//! | `pay_date`                 | yes      | string  | `YYYY-MM-DD`                            |
//! | `period.pay_frequency`     | yes      | string  | `Weekly`, `Bi-Weekly`, `Semi-Monthly`, `Monthly` |
//! | `period.filing_status`     | yes      | string  | `S`, `MFJ`, `MFS`, `HOH`, `QSS` or the full name |
//! | `period.allowances`        | no       | integer | defaults to 0                           |
//! | `period.local_resident`    | no       | bool    | defaults to false                       |
//! | `period.earnings`          | yes      | array   | `kind`, `rate`, `hours` (hourly kinds)  |
//! | `period.deductions`        | no       | array   | `description`, `amount`, `category`     |
//!
//! Quote decimal amounts so they load exactly.
//!
//! ### Example
//!
//! ```toml
//! employee_name = "Jane Doe"
//! company_name = "Acme Corp"
//! pay_date = "2025-03-14"
//!
//! [period]
//! pay_frequency = "Weekly"
//! filing_status = "S"
//!
//! [[period.earnings]]
//! kind = "Regular"
//! rate = "20.00"
//! hours = "40"
//!
//! [[period.deductions]]
//! description = "401(k)"
//! amount = "50.00"
//! category = "pre_tax"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use paystub_core::{PayPeriodInput, PayPeriodResult, PaystubSummary};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaystubRequest {
    pub employee_name: String,
    pub company_name: String,
    pub pay_date: NaiveDate,
    pub period: PayPeriodInput,
}

impl PaystubRequest {
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse pay-period request")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request: {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("Invalid request: {}", path.display()))
    }

    pub fn summary(
        &self,
        result: &PayPeriodResult,
    ) -> PaystubSummary {
        PaystubSummary::from_result(
            &self.employee_name,
            &self.company_name,
            self.pay_date,
            result,
        )
    }
}
