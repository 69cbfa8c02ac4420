//! Exchange-rate table and cost aggregation
//!
//! Rates convert each currency into the reporting currency and stay fixed
//! for the whole tax year (Treasury reporting rates of exchange). The
//! table is read-only during a run.

use std::collections::HashMap;

use num_traits::{One, Zero};

use crate::error::{EvalError, Result};
use crate::num::Rational;
use crate::portfolio::{HoldingKey, Portfolio};

#[derive(Debug, Clone)]
pub struct ExchangeRateTable {
    reporting_currency: String,
    rates: HashMap<String, Rational>,
}

impl ExchangeRateTable {
    /// Build a table. The reporting currency is given rate 1 if not
    /// supplied explicitly.
    pub fn new(
        reporting_currency: impl Into<String>,
        rates: impl IntoIterator<Item = (String, Rational)>,
    ) -> Self {
        let reporting_currency = reporting_currency.into();
        let mut rates: HashMap<String, Rational> = rates.into_iter().collect();
        rates
            .entry(reporting_currency.clone())
            .or_insert_with(Rational::one);
        Self {
            reporting_currency,
            rates,
        }
    }

    pub fn reporting_currency(&self) -> &str {
        &self.reporting_currency
    }

    /// Conversion rate for a currency. A currency without a configured
    /// rate is a configuration fault, never a zero rate.
    pub fn rate(&self, currency: &str) -> Result<&Rational> {
        self.rates
            .get(currency)
            .ok_or_else(|| EvalError::MissingExchangeRate(currency.to_string()).into())
    }

    pub fn contains(&self, currency: &str) -> bool {
        self.rates.contains_key(currency)
    }

    /// Sum a cost mapping into a single reporting-currency value:
    /// amount divided by that currency's rate, over every cash entry.
    /// Security entries left unresolved by the liquidation valuer carry no
    /// known price and contribute nothing.
    pub fn aggregate(&self, cost: &Portfolio) -> Result<Rational> {
        let mut sum = Rational::zero();
        for (key, quantity) in cost.iter() {
            match key {
                HoldingKey::Cash(currency) => {
                    sum += quantity / self.rate(currency)?;
                }
                HoldingKey::Asset(_) => {}
            }
        }
        Ok(sum)
    }
}
