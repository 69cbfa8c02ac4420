//! Highwater - peak brokerage account value evaluator
//!
//! This library reconstructs a brokerage account's composition and value
//! at every point in a tax year by replaying its operation history
//! backward from the current snapshot, and reports the maximum aggregate
//! value observed in the reporting currency.

pub mod config;
pub mod engine;
pub mod error;
pub mod inputs;
pub mod num;
pub mod ops;
pub mod portfolio;
pub mod rates;
pub mod report;
pub mod tickers;
pub mod valuation;
