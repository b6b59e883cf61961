//! CSV file price adapter.
//!
//! Reads `<base_path>/<TICKER>.csv`. The first column holds the date and the
//! close column is found by header name (`Close`, else `Adj Close`), so both
//! plain `date,close` files and downloader exports with extra columns work.
//! Rows whose first field is not a date (such as the ticker and index rows
//! of a multi-row header) are skipped.

use crate::domain::error::BacktestError;
use crate::domain::price::PricePoint;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }
}

fn find_close_column(headers: &csv::StringRecord) -> Option<usize> {
    let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    normalized
        .iter()
        .position(|h| h == "close")
        .or_else(|| normalized.iter().position(|h| h == "adj close"))
}

/// Accepts `YYYY-MM-DD` optionally followed by a time component.
fn parse_date(field: &str) -> Option<NaiveDate> {
    let field = field.trim();
    let date_part = field.get(..10).unwrap_or(field);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

impl DataPort for CsvAdapter {
    fn fetch_closes(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, BacktestError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| BacktestError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = rdr.headers().map_err(|e| BacktestError::DataSource {
            reason: format!("CSV header error: {}", e),
        })?;
        let close_idx = find_close_column(headers).ok_or_else(|| BacktestError::DataSource {
            reason: format!("{}: no Close column", path.display()),
        })?;

        let mut points = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| BacktestError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;

            let Some(date) = record.get(0).and_then(parse_date) else {
                continue;
            };

            if date < start_date || date > end_date {
                continue;
            }

            let raw = record.get(close_idx).unwrap_or("").trim();
            let close = match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => {
                    tracing::warn!(%ticker, %date, value = raw, "skipping row without a close");
                    continue;
                }
            };

            points.push(PricePoint::new(date, close));
        }

        points.sort_by_key(|p| p.date);
        if let Some(dup) = points.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(BacktestError::DataSource {
                reason: format!("{}: duplicate date {}", path.display(), dup[0].date),
            });
        }

        tracing::debug!(%ticker, rows = points.len(), "loaded closes from {}", path.display());
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let plain = "Date,Open,High,Low,Close,Volume\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n";
        fs::write(path.join("BHP.AX.csv"), plain).unwrap();

        let multi_header = "Price,Close,High,Low,Open,Volume\n\
            Ticker,AAPL,AAPL,AAPL,AAPL,AAPL\n\
            Date,,,,,\n\
            2024-01-02,185.64,188.44,183.88,187.15,82488700\n\
            2024-01-03,184.25,185.88,183.43,184.22,58414500\n";
        fs::write(path.join("AAPL.csv"), multi_header).unwrap();

        let adj_only = "date,adj close\n2024-01-02 00:00:00-05:00,50.5\n2024-01-03,\n2024-01-04,51.0\n";
        fs::write(path.join("ADJ.csv"), adj_only).unwrap();

        fs::write(path.join("EMPTY.csv"), "date,close\n").unwrap();
        fs::write(path.join("NOCLOSE.csv"), "date,open\n2024-01-02,1.0\n").unwrap();
        fs::write(
            path.join("DUP.csv"),
            "date,close\n2024-01-02,1.0\n2024-01-02,2.0\n",
        )
        .unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_closes_sorts_by_date() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let points = adapter
            .fetch_closes("BHP.AX", date(2024, 1, 1), date(2024, 1, 31))
            .unwrap();

        assert_eq!(points.len(), 3);
        assert_eq!(points[0], PricePoint::new(date(2024, 1, 15), 105.0));
        assert_eq!(points[2], PricePoint::new(date(2024, 1, 17), 115.0));
    }

    #[test]
    fn fetch_closes_filters_by_date() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let points = adapter
            .fetch_closes("BHP.AX", date(2024, 1, 16), date(2024, 1, 16))
            .unwrap();

        assert_eq!(points, vec![PricePoint::new(date(2024, 1, 16), 110.0)]);
    }

    #[test]
    fn fetch_closes_skips_multi_row_header() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let points = adapter
            .fetch_closes("AAPL", date(2024, 1, 1), date(2024, 12, 31))
            .unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].close, 185.64);
        assert_eq!(points[1].close, 184.25);
    }

    #[test]
    fn fetch_closes_falls_back_to_adj_close_and_skips_blanks() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let points = adapter
            .fetch_closes("ADJ", date(2024, 1, 1), date(2024, 12, 31))
            .unwrap();

        assert_eq!(
            points,
            vec![
                PricePoint::new(date(2024, 1, 2), 50.5),
                PricePoint::new(date(2024, 1, 4), 51.0)
            ]
        );
    }

    #[test]
    fn fetch_closes_empty_file_is_empty() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let points = adapter
            .fetch_closes("EMPTY", date(2024, 1, 1), date(2024, 12, 31))
            .unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn fetch_closes_missing_file_is_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let result = adapter.fetch_closes("XYZ", date(2024, 1, 1), date(2024, 1, 31));
        assert!(matches!(result, Err(BacktestError::DataSource { .. })));
    }

    #[test]
    fn fetch_closes_requires_close_column() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let result = adapter.fetch_closes("NOCLOSE", date(2024, 1, 1), date(2024, 1, 31));
        assert!(matches!(result, Err(BacktestError::DataSource { .. })));
    }

    #[test]
    fn fetch_closes_rejects_duplicate_dates() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let result = adapter.fetch_closes("DUP", date(2024, 1, 1), date(2024, 1, 31));
        assert!(matches!(result, Err(BacktestError::DataSource { .. })));
    }

    #[test]
    fn parse_date_accepts_timestamps() {
        assert_eq!(parse_date("2024-03-05"), Some(date(2024, 3, 5)));
        assert_eq!(parse_date("2024-03-05 00:00:00+00:00"), Some(date(2024, 3, 5)));
        assert_eq!(parse_date("Ticker"), None);
        assert_eq!(parse_date(""), None);
    }
}
