//! Time-reversal valuation engine
//!
//! Walks the full set of timestamped updates (operation reversals and
//! price observations) from the newest timestamp down to the oldest,
//! re-deriving the portfolio and price state at each step and valuing it.
//! Among the steps whose timestamp falls inside the tax year, the one with
//! the greatest aggregate value becomes the answer.
//!
//! The walk is a single sequential fold: each step clones the previous
//! step's state, so earlier snapshots stay intact for the trace.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use num_traits::Zero;
use tracing::debug;

use crate::error::{EvalError, Result};
use crate::num::{format_rational, Rational};
use crate::ops::{Operation, Update};
use crate::portfolio::{Portfolio, PriceTable};
use crate::rates::ExchangeRateTable;
use crate::valuation;

/// Price observation from one historical candle.
#[derive(Debug, Clone)]
pub struct Candle {
    pub asset_uid: String,
    pub date: DateTime<Utc>,
    pub price: Rational,
    pub currency: String,
}

/// All updates to replay, grouped by timestamp. Updates sharing a
/// timestamp are applied as one batch; intra-batch order carries no
/// guarantee (accepted approximation noise when a trade and a candle for
/// the same asset coincide).
#[derive(Debug, Clone, Default)]
pub struct UpdateSchedule {
    by_time: BTreeMap<DateTime<Utc>, Vec<Update>>,
}

impl UpdateSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpret every operation and candle into the full update set.
    /// Fails before any replay happens if an operation type is unknown.
    pub fn build(operations: &[Operation], candles: &[Candle]) -> Result<Self> {
        let mut schedule = Self::new();
        for op in operations {
            schedule.push(op.date, Update::from_operation(op)?);
        }
        for candle in candles {
            schedule.push(
                candle.date,
                Update::SetPrice {
                    asset_uid: candle.asset_uid.clone(),
                    price: candle.price.clone(),
                    currency: candle.currency.clone(),
                },
            );
        }
        Ok(schedule)
    }

    pub fn push(&mut self, at: DateTime<Utc>, update: Update) {
        self.by_time.entry(at).or_default().push(update);
    }

    /// Number of distinct timestamps.
    pub fn len(&self) -> usize {
        self.by_time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_time.is_empty()
    }
}

/// One evaluated point of the backward walk, kept for observability.
#[derive(Debug, Clone)]
pub struct Step {
    pub date: DateTime<Utc>,
    pub portfolio: Portfolio,
    pub cost: Portfolio,
    pub aggregate: Rational,
}

/// The in-year step with the greatest aggregate value.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub date: DateTime<Utc>,
    pub portfolio: Portfolio,
    pub prices: PriceTable,
    pub cost: Portfolio,
    pub aggregate: Rational,
}

/// Replay result: the best candidate plus the full step trace. Callers
/// may log or discard the trace; it carries no control-flow significance.
#[derive(Debug)]
pub struct ReplayOutcome {
    pub best: Candidate,
    pub trace: Vec<Step>,
}

/// Walk the schedule backward from the current state and return the peak
/// in-year valuation.
///
/// Acceptance requires strict improvement over the running best (which
/// starts at zero), so on ties the more recent step wins. A walk that
/// retains no candidate is a configuration mismatch (wrong tax year or
/// empty history) and fails with `NoEligibleCandidate`.
pub fn replay(
    portfolio: Portfolio,
    prices: PriceTable,
    schedule: &UpdateSchedule,
    rates: &ExchangeRateTable,
    tax_year: i32,
) -> Result<ReplayOutcome> {
    let mut portfolio = portfolio;
    let mut prices = prices;
    let mut best: Option<Candidate> = None;
    let mut best_aggregate = Rational::zero();
    let mut trace = Vec::with_capacity(schedule.len());

    debug!(tax_year, steps = schedule.len(), "going back in time");
    for (date, batch) in schedule.by_time.iter().rev() {
        let mut next_portfolio = portfolio.clone();
        let mut next_prices = prices.clone();
        for update in batch {
            update.apply(&mut next_portfolio, &mut next_prices);
        }
        portfolio = next_portfolio;
        prices = next_prices;

        let (cost, aggregate) = valuation::value(&portfolio, &prices, rates)?;
        debug!(
            at = %date,
            positions = portfolio.len(),
            aggregate = %format_rational(&aggregate, 2),
            "replayed step"
        );
        trace.push(Step {
            date: *date,
            portfolio: portfolio.clone(),
            cost: cost.clone(),
            aggregate: aggregate.clone(),
        });

        if date.year() != tax_year {
            continue;
        }
        if aggregate > best_aggregate {
            debug!(at = %date, "new best aggregate");
            best_aggregate = aggregate.clone();
            best = Some(Candidate {
                date: *date,
                portfolio: portfolio.clone(),
                prices: prices.clone(),
                cost,
                aggregate,
            });
        }
    }

    let best = best.ok_or(EvalError::NoEligibleCandidate(tax_year))?;
    Ok(ReplayOutcome { best, trace })
}
