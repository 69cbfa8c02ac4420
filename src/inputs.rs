//! Broker export files
//!
//! The network-facing collaborators (portfolio, operations, and candle
//! fetchers) deliver their results as JSON exports; this module holds the
//! wire models and the loaders that turn them into core state. Amounts
//! arrive as decimal strings and are converted to exact rationals here.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::engine::Candle;
use crate::error::Result;
use crate::num::from_decimal;
use crate::ops::Operation;
use crate::portfolio::{HoldingKey, Portfolio, PriceTable};
use crate::tickers::TickerMap;

/// Current account snapshot: open positions plus the ticker lookup table
/// resolved by the exporting side.
#[derive(Debug, Deserialize)]
pub struct SnapshotFile {
    pub positions: Vec<PositionRecord>,
    #[serde(default)]
    pub tickers: HashMap<String, String>,
}

/// One open position. Currency instruments come through as plain cash
/// balances; securities carry their current price and its currency.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PositionRecord {
    Security {
        asset_uid: String,
        quantity: Decimal,
        current_price: Decimal,
        price_currency: String,
    },
    Cash {
        currency: String,
        balance: Decimal,
    },
}

#[derive(Debug, Deserialize)]
pub struct OperationsFile {
    pub operations: Vec<OperationRecord>,
}

/// One executed operation, already filtered to executed state by the
/// exporting side. Cash-only operations may omit the asset and quantity.
#[derive(Debug, Deserialize)]
pub struct OperationRecord {
    #[serde(rename = "type")]
    pub type_tag: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub asset_uid: String,
    #[serde(default)]
    pub quantity: Decimal,
    pub payment: PaymentRecord,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRecord {
    pub amount: Decimal,
    pub currency: String,
}

#[derive(Debug, Deserialize)]
pub struct CandlesFile {
    pub candles: Vec<CandleRecord>,
}

/// One historical candle observation; `high` is the price used for the
/// valuation. The export should span the tax year plus a margin past
/// year-end to counteract boundary artifacts from sparse data.
#[derive(Debug, Deserialize)]
pub struct CandleRecord {
    pub asset_uid: String,
    pub date: DateTime<Utc>,
    pub high: Decimal,
    pub currency: String,
}

/// Initial replay state derived from the snapshot export.
#[derive(Debug)]
pub struct Snapshot {
    pub portfolio: Portfolio,
    pub prices: PriceTable,
    pub tickers: TickerMap,
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot file {}", path.display()))?;
    let file: SnapshotFile = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse snapshot file {}", path.display()))?;

    let mut portfolio = Portfolio::new();
    let mut prices = PriceTable::new();
    for position in &file.positions {
        match position {
            PositionRecord::Security {
                asset_uid,
                quantity,
                current_price,
                price_currency,
            } => {
                // Several instruments may resolve to one asset; sum them.
                portfolio.add(HoldingKey::asset(asset_uid.clone()), &from_decimal(*quantity));
                prices.set(
                    asset_uid.clone(),
                    from_decimal(*current_price),
                    price_currency.clone(),
                );
            }
            PositionRecord::Cash { currency, balance } => {
                portfolio.add(HoldingKey::cash(currency.clone()), &from_decimal(*balance));
            }
        }
    }

    debug!(
        positions = file.positions.len(),
        holdings = portfolio.len(),
        "loaded snapshot"
    );
    Ok(Snapshot {
        portfolio,
        prices,
        tickers: TickerMap::new(file.tickers),
    })
}

pub fn load_operations(path: &Path) -> Result<Vec<Operation>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read operations file {}", path.display()))?;
    let file: OperationsFile = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse operations file {}", path.display()))?;

    let operations = file
        .operations
        .into_iter()
        .map(|record| Operation {
            type_tag: record.type_tag,
            date: record.date,
            asset_uid: record.asset_uid,
            quantity: from_decimal(record.quantity),
            payment_amount: from_decimal(record.payment.amount),
            payment_currency: record.payment.currency,
        })
        .collect::<Vec<_>>();

    debug!(count = operations.len(), "loaded operations");
    Ok(operations)
}

pub fn load_candles(path: &Path) -> Result<Vec<Candle>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read candles file {}", path.display()))?;
    let file: CandlesFile = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse candles file {}", path.display()))?;

    let candles = file
        .candles
        .into_iter()
        .map(|record| Candle {
            asset_uid: record.asset_uid,
            date: record.date,
            price: from_decimal(record.high),
            currency: record.currency,
        })
        .collect::<Vec<_>>();

    debug!(count = candles.len(), "loaded candles");
    Ok(candles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::num::from_int;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_snapshot_builds_state() {
        let file = write_file(
            r#"{
                "positions": [
                    {"kind": "security", "asset_uid": "uid-1", "quantity": "10",
                     "current_price": "25.50", "price_currency": "usd"},
                    {"kind": "security", "asset_uid": "uid-1", "quantity": "5",
                     "current_price": "25.50", "price_currency": "usd"},
                    {"kind": "cash", "currency": "usd", "balance": "1000"}
                ],
                "tickers": {"uid-1": "ACME"}
            }"#,
        );

        let snapshot = load_snapshot(file.path()).unwrap();
        assert_eq!(
            snapshot.portfolio.get(&HoldingKey::asset("uid-1")),
            Some(&from_int(15))
        );
        assert_eq!(
            snapshot.portfolio.get(&HoldingKey::cash("usd")),
            Some(&from_int(1000))
        );
        let (price, currency) = snapshot.prices.get("uid-1").unwrap();
        assert_eq!(price, &crate::num::from_decimal("25.50".parse().unwrap()));
        assert_eq!(currency, "usd");
        assert_eq!(snapshot.tickers.display("uid-1"), "ACME");
    }

    #[test]
    fn test_load_operations_defaults_optional_fields() {
        let file = write_file(
            r#"{
                "operations": [
                    {"type": "TAX", "date": "2025-03-10T14:00:00Z",
                     "payment": {"amount": "-12.34", "currency": "usd"}}
                ]
            }"#,
        );

        let operations = load_operations(file.path()).unwrap();
        assert_eq!(operations.len(), 1);
        assert_eq!(operations[0].type_tag, "TAX");
        assert_eq!(operations[0].asset_uid, "");
        assert_eq!(operations[0].quantity, from_int(0));
    }

    #[test]
    fn test_load_candles() {
        let file = write_file(
            r#"{
                "candles": [
                    {"asset_uid": "uid-1", "date": "2025-07-01T10:00:00Z",
                     "high": "101.25", "currency": "eur"}
                ]
            }"#,
        );

        let candles = load_candles(file.path()).unwrap();
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].currency, "eur");
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let file = write_file("{ not json");
        let err = load_snapshot(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse snapshot file"));
    }
}
