//! Lagged position simulation.
//!
//! A signal observed at the close of period i-1 is acted on in period i:
//! position[0] = None, position[i] = signal[i-1].

use super::signal::{Exposure, SignalSeries};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeFlag {
    NoChange,
    Transition,
}

impl TradeFlag {
    pub fn is_transition(self) -> bool {
        self == TradeFlag::Transition
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionSeries {
    pub positions: Vec<Option<Exposure>>,
    pub trade_flags: Vec<TradeFlag>,
}

impl PositionSeries {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn trade_count(&self) -> usize {
        self.trade_flags.iter().filter(|f| f.is_transition()).count()
    }

    pub fn days_invested(&self) -> usize {
        self.positions
            .iter()
            .filter(|p| **p == Some(Exposure::Long))
            .count()
    }
}

/// Classify the move from `prev` to `curr`.
///
/// A period with no prior position counts as its own state, so the first
/// entry into the market is a trade. The first defined position is not
/// always a trade, though: settling into Flat straight after warmup leaves
/// exposure unchanged and costs nothing, the same as a 0/1 position diff.
pub fn classify_transition(prev: Option<Exposure>, curr: Option<Exposure>) -> TradeFlag {
    match (prev, curr) {
        (a, b) if a == b => TradeFlag::NoChange,
        (None, Some(Exposure::Flat)) | (Some(Exposure::Flat), None) => TradeFlag::NoChange,
        _ => TradeFlag::Transition,
    }
}

pub fn simulate_positions(signals: &SignalSeries) -> PositionSeries {
    let n = signals.len();
    let mut positions = Vec::with_capacity(n);
    if n > 0 {
        positions.push(None);
        positions.extend_from_slice(&signals.signals[..n - 1]);
    }

    let mut trade_flags = Vec::with_capacity(n);
    let mut prev = None;
    for &curr in &positions {
        trade_flags.push(classify_transition(prev, curr));
        prev = curr;
    }

    PositionSeries {
        positions,
        trade_flags,
    }
}
