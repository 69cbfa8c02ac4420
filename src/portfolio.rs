//! Portfolio and price state
//!
//! A portfolio is a single mapping from holding key (asset or cash) to a
//! signed rational quantity. Cash balances and security positions live in
//! the same map; the key tells them apart. Entries that reach exactly zero
//! are removed immediately, so every key present holds a non-zero quantity.

use std::collections::BTreeMap;
use std::fmt;

use num_traits::Zero;

use crate::num::Rational;

/// Key of one portfolio entry: either a security position (by internal
/// asset identifier) or a cash balance (by ISO currency code).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HoldingKey {
    Asset(String),
    Cash(String),
}

impl HoldingKey {
    pub fn asset(uid: impl Into<String>) -> Self {
        HoldingKey::Asset(uid.into())
    }

    pub fn cash(currency: impl Into<String>) -> Self {
        HoldingKey::Cash(currency.into())
    }
}

impl fmt::Display for HoldingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HoldingKey::Asset(uid) => write!(f, "{}", uid),
            HoldingKey::Cash(currency) => write!(f, "{}", currency),
        }
    }
}

/// Holdings mapping with the zero-pruning invariant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Portfolio {
    holdings: BTreeMap<HoldingKey, Rational>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `delta` to the entry for `key`, treating an absent entry as zero.
    /// If the result is exactly zero the entry is removed.
    pub fn add(&mut self, key: HoldingKey, delta: &Rational) {
        let updated = match self.holdings.get(&key) {
            Some(current) => current + delta,
            None => delta.clone(),
        };
        if updated.is_zero() {
            self.holdings.remove(&key);
        } else {
            self.holdings.insert(key, updated);
        }
    }

    /// Subtract `delta` from the entry for `key`.
    pub fn sub(&mut self, key: HoldingKey, delta: &Rational) {
        self.add(key, &(-delta));
    }

    /// Remove an entry outright, returning its quantity if present.
    pub fn remove(&mut self, key: &HoldingKey) -> Option<Rational> {
        self.holdings.remove(key)
    }

    pub fn get(&self, key: &HoldingKey) -> Option<&Rational> {
        self.holdings.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HoldingKey, &Rational)> {
        self.holdings.iter()
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }
}

impl FromIterator<(HoldingKey, Rational)> for Portfolio {
    fn from_iter<I: IntoIterator<Item = (HoldingKey, Rational)>>(iter: I) -> Self {
        let mut portfolio = Portfolio::new();
        for (key, quantity) in iter {
            portfolio.add(key, &quantity);
        }
        portfolio
    }
}

/// Most-recently-known price per asset, with the currency each price is
/// denominated in. Replayed backward, "most recent" means the earliest
/// candle seen so far in the walk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    prices: BTreeMap<String, (Rational, String)>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, asset_uid: impl Into<String>, price: Rational, currency: impl Into<String>) {
        self.prices.insert(asset_uid.into(), (price, currency.into()));
    }

    /// Price and denomination currency for an asset, if any observation
    /// has been recorded.
    pub fn get(&self, asset_uid: &str) -> Option<(&Rational, &str)> {
        self.prices
            .get(asset_uid)
            .map(|(price, currency)| (price, currency.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &(Rational, String))> {
        self.prices.iter()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::num::from_int;

    #[test]
    fn test_add_accumulates() {
        let mut portfolio = Portfolio::new();
        portfolio.add(HoldingKey::asset("a"), &from_int(3));
        portfolio.add(HoldingKey::asset("a"), &from_int(4));
        assert_eq!(portfolio.get(&HoldingKey::asset("a")), Some(&from_int(7)));
    }

    #[test]
    fn test_zero_entry_is_pruned() {
        let mut portfolio = Portfolio::new();
        portfolio.add(HoldingKey::asset("a"), &from_int(5));
        portfolio.sub(HoldingKey::asset("a"), &from_int(5));
        assert_eq!(portfolio.get(&HoldingKey::asset("a")), None);
        assert!(portfolio.is_empty());
    }

    #[test]
    fn test_sub_from_absent_goes_negative() {
        let mut portfolio = Portfolio::new();
        portfolio.sub(HoldingKey::cash("usd"), &from_int(100));
        assert_eq!(portfolio.get(&HoldingKey::cash("usd")), Some(&from_int(-100)));
    }

    #[test]
    fn test_cash_and_asset_keys_are_distinct() {
        let mut portfolio = Portfolio::new();
        portfolio.add(HoldingKey::asset("usd"), &from_int(1));
        portfolio.add(HoldingKey::cash("usd"), &from_int(2));
        assert_eq!(portfolio.len(), 2);
    }

    #[test]
    fn test_no_zero_entries_after_any_mutation_sequence() {
        let mut portfolio = Portfolio::new();
        let deltas = [3i64, -1, -2, 10, -10, 4];
        for delta in deltas {
            portfolio.add(HoldingKey::asset("x"), &from_int(delta));
            for (_, quantity) in portfolio.iter() {
                assert!(!crate::num::is_zero(quantity));
            }
        }
        assert_eq!(portfolio.get(&HoldingKey::asset("x")), Some(&from_int(4)));
    }

    #[test]
    fn test_price_table_overwrite() {
        let mut prices = PriceTable::new();
        prices.set("a", from_int(10), "usd");
        prices.set("a", from_int(9), "usd");
        let (price, currency) = prices.get("a").unwrap();
        assert_eq!(price, &from_int(9));
        assert_eq!(currency, "usd");
    }
}
