//! Year-to-date totals carried between runs as TOML.
//!
//! Amounts are stored unrounded so that a year of paystubs adds up to the
//! same totals as one calculation over the whole year.

use std::path::Path;

use anyhow::{Context, Result};
use paystub_core::YtdAccumulators;

pub fn read(path: &Path) -> Result<YtdAccumulators> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read YTD file: {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("Invalid YTD file: {}", path.display()))
}

pub fn write(
    path: &Path,
    ytd: &YtdAccumulators,
) -> Result<()> {
    let contents = toml::to_string(ytd).context("Failed to serialize YTD totals")?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write YTD file: {}", path.display()))
}
