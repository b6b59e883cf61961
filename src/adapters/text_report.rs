//! Console summary table.
//!
//! Layout follows the classic two-column report: metric name left-aligned
//! in 30 columns, value after a `|`.

use crate::domain::metrics::Metrics;
use std::fmt::Write;

const RULE_WIDTH: usize = 50;

fn row(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "{:<30} | {}", label, value);
}

fn rule(out: &mut String, ch: char) {
    let _ = writeln!(out, "{}", ch.to_string().repeat(RULE_WIDTH));
}

fn ratio(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.4}", v),
        None => "undefined".to_string(),
    }
}

/// Render the metric table. Total returns are shown as net gain, i.e. the
/// final value as a percentage of the investment minus 100.
pub fn render_summary(ticker: &str, metrics: &Metrics) -> String {
    let mut out = String::new();

    out.push('\n');
    rule(&mut out, '=');
    let _ = writeln!(out, "MA STRATEGY BACKTESTING REPORT: {}", ticker);
    rule(&mut out, '=');
    row(&mut out, "Metric", "Value");
    rule(&mut out, '-');
    row(
        &mut out,
        "Number of Trades Executed",
        &metrics.trade_count.to_string(),
    );
    rule(&mut out, '-');
    row(
        &mut out,
        "Strategy Total Return",
        &format!("{:.2}%", metrics.strategy_total_return_pct - 100.0),
    );
    row(
        &mut out,
        "Strategy Final Value",
        &format!("{:.2}", metrics.strategy_final_value),
    );
    row(
        &mut out,
        "Buy and Hold Total Return",
        &format!("{:.2}%", metrics.market_total_return_pct - 100.0),
    );
    row(
        &mut out,
        "Buy and Hold Final Value",
        &format!("{:.2}", metrics.market_final_value),
    );
    row(
        &mut out,
        "Strategy Max Drawdown",
        &format!("{:.2}%", metrics.max_drawdown_pct * 100.0),
    );
    rule(&mut out, '-');
    row(
        &mut out,
        "Total Days Analyzed",
        &metrics.days_analyzed.to_string(),
    );
    row(
        &mut out,
        "Total Days Invested",
        &metrics.days_invested.to_string(),
    );
    row(
        &mut out,
        "Total Days Not Invested",
        &metrics.days_not_invested.to_string(),
    );
    rule(&mut out, '-');
    row(
        &mut out,
        "Strategy Volatility",
        &ratio(metrics.strategy_volatility),
    );
    row(
        &mut out,
        "Strategy Sharpe Ratio",
        &ratio(metrics.strategy_sharpe),
    );
    rule(&mut out, '-');
    row(&mut out, "Market Volatility", &ratio(metrics.market_volatility));
    row(&mut out, "Market Sharpe Ratio", &ratio(metrics.market_sharpe));
    rule(&mut out, '=');

    out
}
