//! CLI report rendering
//!
//! Formats the snapshot valuation and the best replayed candidate as
//! tables. Purely presentational; all numbers shown here are rounded
//! renderings of the exact values the engine carries.

use colored::Colorize;
use itertools::Itertools;
use tabled::{settings::Style, Table, Tabled};

use crate::engine::{Candidate, Step};
use crate::num::{format_rational, Rational};
use crate::portfolio::{HoldingKey, Portfolio, PriceTable};
use crate::rates::ExchangeRateTable;
use crate::tickers::TickerMap;

#[derive(Tabled)]
struct PositionRow {
    #[tabled(rename = "Position")]
    name: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
}

#[derive(Tabled)]
struct CostRow {
    #[tabled(rename = "Currency")]
    currency: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

#[derive(Tabled)]
struct PriceRow {
    #[tabled(rename = "Position")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Currency")]
    currency: String,
}

fn positions_table(portfolio: &Portfolio, tickers: &TickerMap) -> String {
    let rows: Vec<PositionRow> = tickers
        .group(portfolio)
        .into_iter()
        .map(|(name, quantity)| PositionRow {
            name,
            quantity: format_rational(&quantity, 4),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

fn cost_table(cost: &Portfolio) -> String {
    let rows: Vec<CostRow> = cost
        .iter()
        .map(|(key, amount)| CostRow {
            currency: match key {
                HoldingKey::Cash(currency) => currency.clone(),
                HoldingKey::Asset(uid) => format!("{} (unpriced)", uid),
            },
            amount: format_rational(amount, 2),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

fn prices_table(prices: &PriceTable, tickers: &TickerMap) -> String {
    let rows: Vec<PriceRow> = prices
        .iter()
        .sorted_by(|a, b| tickers.display(a.0).cmp(tickers.display(b.0)))
        .map(|(uid, (price, currency))| PriceRow {
            name: tickers.display(uid).to_string(),
            price: format_rational(price, 4),
            currency: currency.clone(),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

fn aggregate_line(aggregate: &Rational, rates: &ExchangeRateTable) -> String {
    format!(
        "Aggregate value: {} {}",
        format_rational(aggregate, 2).green().bold(),
        rates.reporting_currency()
    )
}

/// Print the current snapshot valuation (no replay).
pub fn print_snapshot(
    portfolio: &Portfolio,
    cost: &Portfolio,
    aggregate: &Rational,
    tickers: &TickerMap,
    rates: &ExchangeRateTable,
) {
    println!("\n{}", "Current portfolio".bold());
    println!("{}", positions_table(portfolio, tickers));
    println!("\n{}", "Liquidation cost".bold());
    println!("{}", cost_table(cost));
    println!("\n{}\n", aggregate_line(aggregate, rates));
}

/// Print the peak in-year valuation found by the backward replay.
pub fn print_best(candidate: &Candidate, tickers: &TickerMap, rates: &ExchangeRateTable) {
    println!(
        "\n{} {}",
        "Peak value at".bold(),
        candidate.date.to_rfc3339().bold()
    );
    println!("\n{}", "Portfolio".bold());
    println!("{}", positions_table(&candidate.portfolio, tickers));
    println!("\n{}", "Prices".bold());
    println!("{}", prices_table(&candidate.prices, tickers));
    println!("\n{}", "Liquidation cost".bold());
    println!("{}", cost_table(&candidate.cost));
    println!("\n{}\n", aggregate_line(&candidate.aggregate, rates));
}

/// Print every replayed step, newest first.
pub fn print_trace(trace: &[Step], rates: &ExchangeRateTable) {
    println!("\n{}", "Replay trace (newest first)".bold());
    for step in trace {
        println!(
            "  {}  positions={:<3} aggregate={} {}",
            step.date.to_rfc3339(),
            step.portfolio.len(),
            format_rational(&step.aggregate, 2),
            rates.reporting_currency()
        );
    }
    println!();
}
