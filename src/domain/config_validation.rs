//! Configuration validation.
//!
//! Validates every field of a [`BacktestConfig`] before any computation runs.

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::BacktestError;

const SECTION: &str = "backtest";

pub fn validate_backtest_config(config: &BacktestConfig) -> Result<(), BacktestError> {
    validate_ticker(&config.ticker)?;
    validate_investment_amount(config.investment_amount)?;
    validate_period("fast_period", config.fast_period)?;
    validate_period("slow_period", config.slow_period)?;
    validate_transaction_cost(config.transaction_cost)?;
    validate_dates(config)?;
    Ok(())
}

pub fn validate_ticker(ticker: &str) -> Result<(), BacktestError> {
    if ticker.trim().is_empty() {
        return Err(BacktestError::missing(SECTION, "ticker"));
    }
    if ticker
        .chars()
        .any(|c| c.is_whitespace() || c == '/' || c == '\\')
    {
        return Err(BacktestError::invalid(
            SECTION,
            "ticker",
            "ticker must not contain whitespace or path separators",
        ));
    }
    Ok(())
}

fn validate_investment_amount(value: f64) -> Result<(), BacktestError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(BacktestError::invalid(
            SECTION,
            "investment_amount",
            "investment_amount must be positive",
        ));
    }
    Ok(())
}

fn validate_period(key: &str, value: usize) -> Result<(), BacktestError> {
    if value < 1 {
        return Err(BacktestError::invalid(
            SECTION,
            key,
            format!("{key} must be at least 1"),
        ));
    }
    Ok(())
}

fn validate_transaction_cost(value: f64) -> Result<(), BacktestError> {
    if !(0.0..1.0).contains(&value) {
        return Err(BacktestError::invalid(
            SECTION,
            "transaction_cost",
            "transaction_cost must be in [0, 1)",
        ));
    }
    Ok(())
}

fn validate_dates(config: &BacktestConfig) -> Result<(), BacktestError> {
    if config.start_date >= config.end_date {
        return Err(BacktestError::invalid(
            SECTION,
            "start_date",
            "start_date must be before end_date",
        ));
    }
    Ok(())
}
