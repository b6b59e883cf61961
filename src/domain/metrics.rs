//! Performance metrics and statistics.

use chrono::NaiveDate;

use super::error::BacktestError;
use super::position::PositionSeries;
use super::returns::{EquityCurve, ReturnsSeries};

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    /// `None` when the metric is undefined (too few returns, zero variance).
    pub strategy_volatility: Option<f64>,
    pub market_volatility: Option<f64>,
    pub strategy_sharpe: Option<f64>,
    pub market_sharpe: Option<f64>,
    /// Final value as a percentage of the investment (100.0 = break-even).
    pub strategy_total_return_pct: f64,
    pub market_total_return_pct: f64,
    pub strategy_final_value: f64,
    pub market_final_value: f64,
    /// Calendar days between the first and last price date.
    pub days_analyzed: i64,
    /// Trading periods with a long position.
    pub days_invested: usize,
    /// `days_analyzed - days_invested`; mixes calendar and trading days.
    pub days_not_invested: i64,
    pub trade_count: usize,
    pub max_drawdown_pct: f64,
}

impl Metrics {
    pub fn compute(
        positions: &PositionSeries,
        returns: &ReturnsSeries,
        curve: &EquityCurve,
        investment: f64,
    ) -> Self {
        let strategy_final_value = curve.final_strategy().unwrap_or(investment);
        let market_final_value = curve.final_market().unwrap_or(investment);

        let days_analyzed = match (curve.dates.first(), curve.dates.last()) {
            (Some(&first), Some(&last)) => days_analyzed(first, last),
            _ => 0,
        };
        let days_invested = positions.days_invested();

        Metrics {
            strategy_volatility: volatility(&returns.strategy).ok(),
            market_volatility: volatility(&returns.market).ok(),
            strategy_sharpe: sharpe_ratio(&returns.strategy).ok(),
            market_sharpe: sharpe_ratio(&returns.market).ok(),
            strategy_total_return_pct: total_return_pct(strategy_final_value, investment),
            market_total_return_pct: total_return_pct(market_final_value, investment),
            strategy_final_value,
            market_final_value,
            days_analyzed,
            days_invested,
            days_not_invested: days_analyzed - days_invested as i64,
            trade_count: positions.trade_count(),
            max_drawdown_pct: curve.max_drawdown_pct(),
        }
    }

    /// Names of the ratios that came out undefined.
    pub fn undefined_ratios(&self) -> Vec<&'static str> {
        [
            ("strategy volatility", self.strategy_volatility),
            ("market volatility", self.market_volatility),
            ("strategy sharpe ratio", self.strategy_sharpe),
            ("market sharpe ratio", self.market_sharpe),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

fn defined(returns: &[Option<f64>]) -> Vec<f64> {
    returns.iter().filter_map(|r| *r).collect()
}

/// Mean of the defined entries.
pub fn mean(returns: &[Option<f64>]) -> Option<f64> {
    let values = defined(returns);
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Annualized sample standard deviation of the defined entries.
pub fn volatility(returns: &[Option<f64>]) -> Result<f64, BacktestError> {
    let values = defined(returns);
    if values.len() < 2 {
        return Err(BacktestError::DegenerateMetric {
            metric: "volatility".into(),
            reason: format!("need at least 2 returns, have {}", values.len()),
        });
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);

    Ok(variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt())
}

/// Annualized mean return over annualized volatility.
pub fn sharpe_ratio(returns: &[Option<f64>]) -> Result<f64, BacktestError> {
    let vol = volatility(returns).map_err(|e| match e {
        BacktestError::DegenerateMetric { reason, .. } => BacktestError::DegenerateMetric {
            metric: "sharpe ratio".into(),
            reason,
        },
        other => other,
    })?;

    if vol.is_nan() || vol <= 0.0 {
        return Err(BacktestError::DegenerateMetric {
            metric: "sharpe ratio".into(),
            reason: "volatility is zero".into(),
        });
    }

    let mean = mean(returns).unwrap_or(0.0);
    Ok(mean * TRADING_DAYS_PER_YEAR / vol)
}

pub fn total_return_pct(final_value: f64, investment: f64) -> f64 {
    final_value / investment * 100.0
}

pub fn days_analyzed(first: NaiveDate, last: NaiveDate) -> i64 {
    (last - first).num_days()
}
