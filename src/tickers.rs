//! Ticker display mapping
//!
//! Cosmetic translation of internal asset identifiers to human-readable
//! tickers for reports. An asset traded under several instruments resolves
//! to one ticker, so quantities sharing a ticker are summed. Strictly
//! display-side: the valuation path never consults this table.

use std::collections::{BTreeMap, HashMap};

use num_traits::Zero;

use crate::num::Rational;
use crate::portfolio::{HoldingKey, Portfolio};

/// Asset identifier → ticker lookup table, supplied with the snapshot
/// export.
#[derive(Debug, Clone, Default)]
pub struct TickerMap {
    tickers: HashMap<String, String>,
}

impl TickerMap {
    pub fn new(tickers: HashMap<String, String>) -> Self {
        Self { tickers }
    }

    /// Ticker for an asset identifier, falling back to the identifier
    /// itself when none is known.
    pub fn display<'a>(&'a self, asset_uid: &'a str) -> &'a str {
        match self.tickers.get(asset_uid) {
            Some(ticker) if !ticker.is_empty() => ticker,
            _ => asset_uid,
        }
    }

    /// Group portfolio entries by display name, summing quantities that
    /// share a ticker. Cash balances keep their currency code.
    pub fn group(&self, portfolio: &Portfolio) -> BTreeMap<String, Rational> {
        let mut grouped: BTreeMap<String, Rational> = BTreeMap::new();
        for (key, quantity) in portfolio.iter() {
            let name = match key {
                HoldingKey::Asset(uid) => self.display(uid).to_string(),
                HoldingKey::Cash(currency) => currency.clone(),
            };
            *grouped.entry(name).or_insert_with(Rational::zero) += quantity;
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::num::from_int;

    fn make_map() -> TickerMap {
        TickerMap::new(HashMap::from([
            ("uid-1".to_string(), "ACME".to_string()),
            ("uid-2".to_string(), "ACME".to_string()),
            ("uid-3".to_string(), "WIDG".to_string()),
        ]))
    }

    #[test]
    fn test_shared_ticker_sums_quantities() {
        let mut portfolio = Portfolio::new();
        portfolio.add(HoldingKey::asset("uid-1"), &from_int(3));
        portfolio.add(HoldingKey::asset("uid-2"), &from_int(4));
        portfolio.add(HoldingKey::asset("uid-3"), &from_int(1));

        let grouped = make_map().group(&portfolio);
        assert_eq!(grouped.get("ACME"), Some(&from_int(7)));
        assert_eq!(grouped.get("WIDG"), Some(&from_int(1)));
    }

    #[test]
    fn test_unknown_uid_falls_back_to_identifier() {
        let mut portfolio = Portfolio::new();
        portfolio.add(HoldingKey::asset("mystery-uid"), &from_int(2));

        let grouped = make_map().group(&portfolio);
        assert_eq!(grouped.get("mystery-uid"), Some(&from_int(2)));
    }

    #[test]
    fn test_cash_keeps_currency_code() {
        let mut portfolio = Portfolio::new();
        portfolio.add(HoldingKey::cash("usd"), &from_int(500));

        let grouped = make_map().group(&portfolio);
        assert_eq!(grouped.get("usd"), Some(&from_int(500)));
    }
}
