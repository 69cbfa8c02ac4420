use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::cli::Commands;
use highwater::config::Config;
use highwater::num::format_rational;
use highwater::{engine, inputs, report, valuation};

/// Execute a parsed CLI command.
pub fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Evaluate {
            config,
            snapshot,
            operations,
            candles,
            trace,
        } => evaluate(&config, &snapshot, &operations, &candles, trace),
        Commands::Snapshot { config, snapshot } => value_snapshot(&config, &snapshot),
    }
}

fn evaluate(
    config_path: &Path,
    snapshot_path: &Path,
    operations_path: &Path,
    candles_path: &Path,
    trace: bool,
) -> Result<()> {
    let config = Config::load(config_path)?;
    let rates = config.exchange_rates();

    let snapshot = inputs::load_snapshot(snapshot_path)?;
    let operations = inputs::load_operations(operations_path)?;
    let candles = inputs::load_candles(candles_path)?;

    // Step zero: value the current state before walking backward.
    let (_cost, aggregate) = valuation::value(&snapshot.portfolio, &snapshot.prices, &rates)?;
    info!(
        aggregate = %format_rational(&aggregate, 2),
        currency = rates.reporting_currency(),
        "current portfolio value"
    );

    let schedule = engine::UpdateSchedule::build(&operations, &candles)?;
    info!(
        operations = operations.len(),
        candles = candles.len(),
        timestamps = schedule.len(),
        tax_year = config.tax_year,
        "replaying history backward"
    );

    let outcome = engine::replay(
        snapshot.portfolio,
        snapshot.prices,
        &schedule,
        &rates,
        config.tax_year,
    )?;

    if trace {
        report::print_trace(&outcome.trace, &rates);
    }
    report::print_best(&outcome.best, &snapshot.tickers, &rates);
    Ok(())
}

fn value_snapshot(config_path: &Path, snapshot_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    let rates = config.exchange_rates();

    let snapshot = inputs::load_snapshot(snapshot_path)?;
    let (cost, aggregate) = valuation::value(&snapshot.portfolio, &snapshot.prices, &rates)?;
    report::print_snapshot(
        &snapshot.portfolio,
        &cost,
        &aggregate,
        &snapshot.tickers,
        &rates,
    );
    Ok(())
}
