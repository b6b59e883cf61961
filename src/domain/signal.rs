//! Crossover signal generation.
//!
//! signal[i] = Long  if fastMA[i] >  slowMA[i]
//!             Flat  if fastMA[i] <= slowMA[i]
//!             None  while either average is still warming up

use std::fmt;

use super::moving_average::simple_moving_average;
use super::price::PriceSeries;

/// Market exposure for a single period. Undefined periods are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exposure {
    Long,
    Flat,
}

impl fmt::Display for Exposure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exposure::Long => write!(f, "LONG"),
            Exposure::Flat => write!(f, "FLAT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalSeries {
    pub fast_ma: Vec<Option<f64>>,
    pub slow_ma: Vec<Option<f64>>,
    pub signals: Vec<Option<Exposure>>,
}

impl SignalSeries {
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

/// Number of leading periods with an undefined signal.
pub fn warmup_periods(fast_period: usize, slow_period: usize) -> usize {
    fast_period.max(slow_period).saturating_sub(1)
}

/// Compute both averages and the long/flat signal. The periods are used
/// as given; a "fast" period longer than the "slow" one is legal.
pub fn generate_signals(series: &PriceSeries, fast_period: usize, slow_period: usize) -> SignalSeries {
    let closes = series.closes();
    let fast_ma = simple_moving_average(&closes, fast_period);
    let slow_ma = simple_moving_average(&closes, slow_period);

    let signals = fast_ma
        .iter()
        .zip(&slow_ma)
        .map(|(fast, slow)| match (fast, slow) {
            (Some(f), Some(s)) if f > s => Some(Exposure::Long),
            (Some(_), Some(_)) => Some(Exposure::Flat),
            _ => None,
        })
        .collect();

    SignalSeries {
        fast_ma,
        slow_ma,
        signals,
    }
}
