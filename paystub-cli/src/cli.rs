use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use paystub_core::source::{DEFAULT_SOURCE, SourceConfig, SourceRegistry};
use paystub_core::{PayPeriodResult, PayrollEngine, PaystubSummary, YtdAccumulators};
use tracing::{debug, info};

use crate::report::PaystubReport;
use crate::request::PaystubRequest;
use crate::ytd_file;

/// Payroll calculator for federal and New Jersey paystubs.
///
/// Reads one pay period from a TOML request, computes gross pay,
/// withholding and net pay, and prints the paystub. Year-to-date totals are
/// threaded between runs with `--ytd-in` and `--ytd-out`.
#[derive(Debug, Parser)]
#[command(name = "paystub", version, about)]
pub struct Cli {
    /// Pay-period request file (TOML).
    #[arg(short, long)]
    pub request: PathBuf,

    /// Tax table source: `bundled` or `files`.
    /// Defaults to `files` when `--tables` is given, otherwise `bundled`.
    #[arg(long)]
    pub source: Option<String>,

    /// Directory holding `brackets.csv` and `rates.toml`.
    #[arg(long)]
    pub tables: Option<PathBuf>,

    /// Year-to-date totals before this period.
    #[arg(long)]
    pub ytd_in: Option<PathBuf>,

    /// Where to write year-to-date totals after this period.
    #[arg(long)]
    pub ytd_out: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `warn,paystub_core=trace`.
    /// Overrides `RUST_LOG`.
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    pub fn source_config(&self) -> SourceConfig {
        let source = match (&self.source, &self.tables) {
            (Some(source), _) => source.as_str(),
            (None, Some(_)) => "files",
            (None, None) => DEFAULT_SOURCE,
        };
        SourceConfig {
            source: source.to_string(),
            location: self.tables.clone(),
        }
    }
}

/// Everything one run produces.
#[derive(Debug)]
pub struct RunOutput {
    /// The printable paystub.
    pub report: String,
    pub result: PayPeriodResult,
    pub summary: PaystubSummary,
}

/// Loads tables and inputs, computes the period and writes YTD if asked.
pub async fn run(
    cli: &Cli,
    registry: &SourceRegistry,
) -> Result<RunOutput> {
    let request = PaystubRequest::load(&cli.request)?;
    let ytd = match &cli.ytd_in {
        Some(path) => ytd_file::read(path)?,
        None => YtdAccumulators::default(),
    };

    let config = cli.source_config();
    debug!(source = %config.source, location = ?config.location, "Selecting tax table source");
    let tables = registry
        .open(&config)?
        .get()
        .await
        .with_context(|| format!("Failed to load tax tables from '{}'", config.source))?;

    let engine = PayrollEngine::new(&tables).context("Tax tables are invalid")?;
    let result = engine
        .calculate(&request.period, &ytd)
        .with_context(|| format!("Failed to calculate pay for {}", request.employee_name))?;

    if let Some(path) = &cli.ytd_out {
        ytd_file::write(path, &result.ytd)?;
        info!(path = %path.display(), "Wrote year-to-date totals");
    }

    let report = PaystubReport::new(&request, &result, &tables.state.name).to_string();
    let summary = request.summary(&result);
    info!(
        employee = %summary.employee_name,
        pay_date = %summary.pay_date,
        net_pay = %summary.net_pay,
        "Paystub ready"
    );

    Ok(RunOutput {
        report,
        result,
        summary,
    })
}
