//! Core domain types and the backtest pipeline.

pub mod backtest;
pub mod config_validation;
pub mod error;
pub mod metrics;
pub mod moving_average;
pub mod position;
pub mod price;
pub mod returns;
pub mod signal;
