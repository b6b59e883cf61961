//! CSV curve export implementing ReportPort.
//!
//! One row per price date with the close, the realized position and the
//! plotted curves. Values are written at full precision.

use std::fs;
use std::path::Path;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::BacktestError;
use crate::ports::report_port::ReportPort;

pub const HEADER: [&str; 7] = [
    "date",
    "close",
    "position",
    "cumulative_market",
    "cumulative_strategy",
    "running_max",
    "drawdown_pct",
];

#[derive(Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn csv_error(e: csv::Error) -> BacktestError {
    BacktestError::Io(std::io::Error::other(e.to_string()))
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, result: &BacktestResult, path: &Path) -> Result<(), BacktestError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut wtr = csv::Writer::from_path(path).map_err(csv_error)?;
        wtr.write_record(HEADER).map_err(csv_error)?;

        let curve = &result.equity;
        let drawdown = curve.drawdown_pct();
        for (i, point) in result.prices.points().iter().enumerate() {
            let position = result.positions.positions[i]
                .map(|p| p.to_string())
                .unwrap_or_default();
            wtr.write_record([
                point.date.format("%Y-%m-%d").to_string(),
                point.close.to_string(),
                position,
                curve.market[i].to_string(),
                curve.strategy[i].to_string(),
                curve.running_max[i].to_string(),
                drawdown[i].to_string(),
            ])
            .map_err(csv_error)?;
        }
        wtr.flush()?;

        tracing::info!(rows = curve.len(), "curves written to {}", path.display());
        Ok(())
    }
}
