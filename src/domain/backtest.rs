//! Backtest pipeline.
//!
//! Prices -> signals -> lagged positions -> returns -> equity curves -> metrics.
//! Every stage is a pure function of the previous stage's output plus the
//! immutable [`BacktestConfig`].

use chrono::NaiveDate;

use super::config_validation::validate_backtest_config;
use super::error::BacktestError;
use super::metrics::Metrics;
use super::position::{simulate_positions, PositionSeries};
use super::price::PriceSeries;
use super::returns::{build_equity_curve, compute_returns, EquityCurve, ReturnsSeries};
use super::signal::{generate_signals, SignalSeries};
use crate::ports::data_port::DataPort;

pub const DEFAULT_TRANSACTION_COST: f64 = 0.001;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub ticker: String,
    pub investment_amount: f64,
    pub fast_period: usize,
    pub slow_period: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Fraction of notional charged per position change.
    pub transaction_cost: f64,
}

impl BacktestConfig {
    /// Minimum number of prices needed for at least one defined signal.
    pub fn required_history(&self) -> usize {
        self.fast_period.max(self.slow_period)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub prices: PriceSeries,
    pub signals: SignalSeries,
    pub positions: PositionSeries,
    pub returns: ReturnsSeries,
    pub equity: EquityCurve,
    pub metrics: Metrics,
}

impl BacktestResult {
    pub fn ticker(&self) -> &str {
        self.prices.ticker()
    }
}

pub fn run_backtest(series: &PriceSeries, config: &BacktestConfig) -> Result<BacktestResult, BacktestError> {
    validate_backtest_config(config)?;

    let required = config.required_history();
    if series.len() < required {
        return Err(BacktestError::InsufficientHistory {
            ticker: series.ticker().to_string(),
            bars: series.len(),
            required,
        });
    }

    let signals = generate_signals(series, config.fast_period, config.slow_period);
    let positions = simulate_positions(&signals);
    tracing::debug!(
        bars = series.len(),
        trades = positions.trade_count(),
        "signals and positions computed"
    );

    let returns = compute_returns(series, &positions, config.transaction_cost);
    let equity = build_equity_curve(series, &returns, config.investment_amount);
    let metrics = Metrics::compute(&positions, &returns, &equity, config.investment_amount);
    for metric in metrics.undefined_ratios() {
        tracing::warn!(metric, "undefined: too few returns or zero variance");
    }

    Ok(BacktestResult {
        prices: series.clone(),
        signals,
        positions,
        returns,
        equity,
        metrics,
    })
}

/// Fetch prices through `data_port` and run the pipeline.
///
/// An empty fetch is fatal ([`BacktestError::NoData`]); nothing is retried.
pub fn run_with_provider(
    data_port: &dyn DataPort,
    config: &BacktestConfig,
) -> Result<BacktestResult, BacktestError> {
    validate_backtest_config(config)?;

    tracing::info!(
        ticker = %config.ticker,
        start = %config.start_date,
        end = %config.end_date,
        "fetching prices"
    );
    let points = data_port.fetch_closes(&config.ticker, config.start_date, config.end_date)?;
    if points.is_empty() {
        return Err(BacktestError::NoData {
            ticker: config.ticker.clone(),
        });
    }

    let series = PriceSeries::new(&config.ticker, points)?;
    tracing::info!(
        bars = series.len(),
        fast = config.fast_period,
        slow = config.slow_period,
        "running backtest"
    );
    run_backtest(&series, config)
}
