//! Liquidation valuer
//!
//! Values a portfolio by "selling everything" at the last known price:
//! every security position with a price observation becomes a cash balance
//! in the price's currency. Positions with no observation yet stay in the
//! output unresolved and contribute nothing to the aggregate — an
//! accepted approximation for assets with no candle before that point in
//! time.

use crate::error::Result;
use crate::num::Rational;
use crate::portfolio::{HoldingKey, Portfolio, PriceTable};
use crate::rates::ExchangeRateTable;

/// Convert every priced security position into cash at quantity × price.
/// Returns the cost mapping; the input portfolio is untouched.
pub fn liquidate(portfolio: &Portfolio, prices: &PriceTable) -> Portfolio {
    let mut cost = portfolio.clone();

    let priced: Vec<(String, Rational, String)> = cost
        .iter()
        .filter_map(|(key, quantity)| match key {
            HoldingKey::Asset(uid) => prices
                .get(uid)
                .map(|(price, currency)| (uid.clone(), price * quantity, currency.to_string())),
            HoldingKey::Cash(_) => None,
        })
        .collect();

    for (uid, proceeds, currency) in priced {
        cost.remove(&HoldingKey::asset(uid));
        cost.add(HoldingKey::cash(currency), &proceeds);
    }

    cost
}

/// Liquidate and aggregate in one go: the cost breakdown by currency plus
/// the single reporting-currency value.
pub fn value(
    portfolio: &Portfolio,
    prices: &PriceTable,
    rates: &ExchangeRateTable,
) -> Result<(Portfolio, Rational)> {
    let cost = liquidate(portfolio, prices);
    let aggregate = rates.aggregate(&cost)?;
    Ok((cost, aggregate))
}
