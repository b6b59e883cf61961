//! Period returns, equity curves and the drawdown reference line.
//!
//! marketReturn[i]   = C[i] / C[i-1] - 1
//! strategyReturn[i] = marketReturn[i] * held(position[i-1]) - cost * trade(i)
//! cumulative[i]     = investment * prod(1 + r[k] for k in 1..=i)
//!
//! All returns are simple returns; index 0 has no return.

use chrono::NaiveDate;

use super::position::PositionSeries;
use super::price::PriceSeries;
use super::signal::Exposure;

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnsSeries {
    pub market: Vec<Option<f64>>,
    pub strategy: Vec<Option<f64>>,
    /// Transaction cost deducted in each period (0.0 when no trade).
    pub costs: Vec<f64>,
}

impl ReturnsSeries {
    pub fn total_cost(&self) -> f64 {
        self.costs.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquityCurve {
    pub dates: Vec<NaiveDate>,
    pub market: Vec<f64>,
    pub strategy: Vec<f64>,
    /// Running peak of the strategy curve.
    pub running_max: Vec<f64>,
}

impl EquityCurve {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn final_market(&self) -> Option<f64> {
        self.market.last().copied()
    }

    pub fn final_strategy(&self) -> Option<f64> {
        self.strategy.last().copied()
    }

    /// strategy[i] / running_max[i] - 1, always <= 0.
    pub fn drawdown_pct(&self) -> Vec<f64> {
        self.strategy
            .iter()
            .zip(&self.running_max)
            .map(|(&value, &peak)| if peak > 0.0 { value / peak - 1.0 } else { 0.0 })
            .collect()
    }

    /// Deepest drawdown as a non-positive fraction.
    pub fn max_drawdown_pct(&self) -> f64 {
        self.drawdown_pct().into_iter().fold(0.0, f64::min)
    }
}

fn held(position: Option<Exposure>) -> f64 {
    match position {
        Some(Exposure::Long) => 1.0,
        Some(Exposure::Flat) | None => 0.0,
    }
}

pub fn market_returns(closes: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return out;
    }
    out.push(None);
    out.extend(closes.windows(2).map(|w| Some(w[1] / w[0] - 1.0)));
    out
}

/// Market and strategy returns per period.
///
/// `positions` must be aligned with `series` (as produced by
/// [`simulate_positions`](super::position::simulate_positions) over signals
/// for the same series); a length mismatch panics.
pub fn compute_returns(series: &PriceSeries, positions: &PositionSeries, transaction_cost: f64) -> ReturnsSeries {
    let market = market_returns(&series.closes());
    let n = market.len();
    debug_assert_eq!(positions.positions.len(), n, "positions not aligned with prices");
    debug_assert_eq!(positions.trade_flags.len(), n, "trade flags not aligned with prices");

    let mut strategy = Vec::with_capacity(n);
    let mut costs = Vec::with_capacity(n);

    for i in 0..n {
        let cost = if positions.trade_flags[i].is_transition() {
            transaction_cost
        } else {
            0.0
        };
        costs.push(cost);

        let value = match market[i] {
            Some(r) => {
                // Exposure entering period i is the position held at i-1.
                let exposure = if i > 0 { held(positions.positions[i - 1]) } else { 0.0 };
                Some(r * exposure - cost)
            }
            None => None,
        };
        strategy.push(value);
    }

    ReturnsSeries {
        market,
        strategy,
        costs,
    }
}

/// Compound period returns starting from `investment`. Undefined returns
/// leave the value unchanged.
pub fn cumulative(returns: &[Option<f64>], investment: f64) -> Vec<f64> {
    let mut value = investment;
    returns
        .iter()
        .map(|r| {
            if let Some(r) = r {
                value *= 1.0 + r;
            }
            value
        })
        .collect()
}

pub fn running_max(values: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    values
        .iter()
        .map(|&v| {
            peak = peak.max(v);
            peak
        })
        .collect()
}

pub fn build_equity_curve(series: &PriceSeries, returns: &ReturnsSeries, investment: f64) -> EquityCurve {
    let market = cumulative(&returns.market, investment);
    let strategy = cumulative(&returns.strategy, investment);
    let running_max = running_max(&strategy);

    EquityCurve {
        dates: series.dates(),
        market,
        strategy,
        running_max,
    }
}
