//! Operation interpreter
//!
//! Converts one historical operation record into a reversible state
//! mutation. The replay walks from "now" toward the start of the year, so
//! every update *undoes* its operation's forward economic effect: a buy is
//! reversed by removing the acquired quantity and restoring the cash that
//! had not yet been spent at that point in time.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::{EvalError, Result};
use crate::num::Rational;
use crate::portfolio::{HoldingKey, Portfolio, PriceTable};

/// Known operation vocabulary. Anything outside this list aborts the run:
/// guessing a reversal rule would silently corrupt the valuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    Buy,
    Sell,
    BrokerFee,
    Dividend,
    DividendTax,
    Input,
    Tax,
    InputSecurities,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Buy => "BUY",
            OperationType::Sell => "SELL",
            OperationType::BrokerFee => "BROKER_FEE",
            OperationType::Dividend => "DIVIDEND",
            OperationType::DividendTax => "DIVIDEND_TAX",
            OperationType::Input => "INPUT",
            OperationType::Tax => "TAX",
            OperationType::InputSecurities => "INPUT_SECURITIES",
        }
    }
}

impl FromStr for OperationType {
    type Err = EvalError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(OperationType::Buy),
            "SELL" => Ok(OperationType::Sell),
            "BROKER_FEE" => Ok(OperationType::BrokerFee),
            "DIVIDEND" => Ok(OperationType::Dividend),
            "DIVIDEND_TAX" => Ok(OperationType::DividendTax),
            "INPUT" => Ok(OperationType::Input),
            "TAX" => Ok(OperationType::Tax),
            "INPUT_SECURITIES" => Ok(OperationType::InputSecurities),
            other => Err(EvalError::UnsupportedOperation(other.to_string())),
        }
    }
}

/// One executed operation from the account history, already resolved to an
/// asset identifier and converted to exact rationals. The type tag is kept
/// raw so that unknown vocabulary surfaces as a classified error here
/// rather than as a deserialization failure upstream.
#[derive(Debug, Clone)]
pub struct Operation {
    pub type_tag: String,
    pub date: DateTime<Utc>,
    pub asset_uid: String,
    pub quantity: Rational,
    pub payment_amount: Rational,
    pub payment_currency: String,
}

/// A deferred, inspectable state mutation. Updates are grouped by
/// timestamp and applied newest-to-oldest; variants named `Undo*` reverse
/// the operation they are derived from, `SetPrice` records a historical
/// candle observation.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// Reverse a buy: drop the acquired quantity, restore the spent cash.
    UndoBuy {
        asset_uid: String,
        quantity: Rational,
        payment_amount: Rational,
        payment_currency: String,
    },
    /// Reverse a sale: restore the sold quantity, remove the proceeds.
    UndoSell {
        asset_uid: String,
        quantity: Rational,
        payment_amount: Rational,
        payment_currency: String,
    },
    /// Reverse a cash-only operation (fee, dividend, tax, cash transfer).
    UndoCashFlow {
        payment_amount: Rational,
        payment_currency: String,
    },
    /// Reverse a securities transfer-in. The associated payment is
    /// informational only and must not touch any balance.
    UndoSecuritiesInput {
        asset_uid: String,
        quantity: Rational,
    },
    /// Record the price observed for an asset at this timestamp.
    SetPrice {
        asset_uid: String,
        price: Rational,
        currency: String,
    },
}

impl Update {
    /// Derive the inverse update for one operation record, or fail on an
    /// unknown type tag.
    pub fn from_operation(op: &Operation) -> Result<Self> {
        let update = match OperationType::from_str(&op.type_tag)? {
            OperationType::Buy => Update::UndoBuy {
                asset_uid: op.asset_uid.clone(),
                quantity: op.quantity.clone(),
                payment_amount: op.payment_amount.clone(),
                payment_currency: op.payment_currency.clone(),
            },
            OperationType::Sell => Update::UndoSell {
                asset_uid: op.asset_uid.clone(),
                quantity: op.quantity.clone(),
                payment_amount: op.payment_amount.clone(),
                payment_currency: op.payment_currency.clone(),
            },
            OperationType::BrokerFee
            | OperationType::Dividend
            | OperationType::DividendTax
            | OperationType::Input
            | OperationType::Tax => Update::UndoCashFlow {
                payment_amount: op.payment_amount.clone(),
                payment_currency: op.payment_currency.clone(),
            },
            OperationType::InputSecurities => Update::UndoSecuritiesInput {
                asset_uid: op.asset_uid.clone(),
                quantity: op.quantity.clone(),
            },
        };
        Ok(update)
    }

    /// Apply this update to the replay state.
    pub fn apply(&self, portfolio: &mut Portfolio, prices: &mut PriceTable) {
        match self {
            Update::UndoBuy {
                asset_uid,
                quantity,
                payment_amount,
                payment_currency,
            } => {
                portfolio.sub(HoldingKey::asset(asset_uid.clone()), quantity);
                portfolio.sub(HoldingKey::cash(payment_currency.clone()), payment_amount);
            }
            Update::UndoSell {
                asset_uid,
                quantity,
                payment_amount,
                payment_currency,
            } => {
                portfolio.add(HoldingKey::asset(asset_uid.clone()), quantity);
                portfolio.sub(HoldingKey::cash(payment_currency.clone()), payment_amount);
            }
            Update::UndoCashFlow {
                payment_amount,
                payment_currency,
            } => {
                portfolio.sub(HoldingKey::cash(payment_currency.clone()), payment_amount);
            }
            Update::UndoSecuritiesInput {
                asset_uid,
                quantity,
            } => {
                portfolio.sub(HoldingKey::asset(asset_uid.clone()), quantity);
            }
            Update::SetPrice {
                asset_uid,
                price,
                currency,
            } => {
                prices.set(asset_uid.clone(), price.clone(), currency.clone());
            }
        }
    }
}
