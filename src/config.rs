//! Run configuration
//!
//! TOML file carrying the target tax year, the reporting currency, and the
//! static exchange-rate table (e.g. the Treasury reporting rates of
//! exchange for that year). Rates are written as decimal strings and
//! converted to exact rationals once, at load time.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use num_traits::One;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::Result;
use crate::num::{from_decimal, Rational};
use crate::rates::ExchangeRateTable;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub tax_year: i32,
    pub reporting_currency: String,
    /// Currency code → units per one unit of the reporting currency.
    pub rates: HashMap<String, Decimal>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.reporting_currency.is_empty() {
            bail!("reporting_currency must be set");
        }
        if let Some(rate) = self.rates.get(&self.reporting_currency) {
            if from_decimal(*rate) != Rational::one() {
                bail!(
                    "reporting currency {} must have rate 1, got {}",
                    self.reporting_currency,
                    rate
                );
            }
        }
        for (currency, rate) in &self.rates {
            if rate.is_sign_negative() || rate.is_zero() {
                bail!("rate for {} must be positive, got {}", currency, rate);
            }
        }
        Ok(())
    }

    /// The immutable rate table used for the whole run.
    pub fn exchange_rates(&self) -> ExchangeRateTable {
        ExchangeRateTable::new(
            self.reporting_currency.clone(),
            self.rates
                .iter()
                .map(|(currency, rate)| (currency.clone(), from_decimal(*rate))),
        )
    }
}
