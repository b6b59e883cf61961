//! Simple moving average.
//!
//! SMA(n)[i] = sum(C[i-j] for j in 0..n) / n
//! Warmup: the first (n-1) entries are `None`.

/// Trailing arithmetic mean of `values` over `period` entries.
///
/// Each window is summed from scratch so that equal windows produce
/// bit-identical averages; a running sum would drift.
pub fn simple_moving_average(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    if period == 0 {
        out.resize(values.len(), None);
        return out;
    }

    let warmup = period - 1;
    for i in 0..values.len() {
        if i < warmup {
            out.push(None);
            continue;
        }
        let window = &values[i + 1 - period..=i];
        out.push(Some(window.iter().sum::<f64>() / period as f64));
    }
    out
}
