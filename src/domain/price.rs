//! Daily closing-price series.

use chrono::NaiveDate;

use super::error::BacktestError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Ordered closing prices for a single ticker.
///
/// Construction enforces: at least one point, dates strictly increasing,
/// closes positive and finite. Missing trading days are simply absent.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    ticker: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(ticker: &str, points: Vec<PricePoint>) -> Result<Self, BacktestError> {
        if points.is_empty() {
            return Err(BacktestError::NoData {
                ticker: ticker.to_string(),
            });
        }

        for (i, point) in points.iter().enumerate() {
            if !point.close.is_finite() || point.close <= 0.0 {
                return Err(BacktestError::InvalidSeries {
                    reason: format!("close on {} must be positive, got {}", point.date, point.close),
                });
            }
            if i > 0 && point.date <= points[i - 1].date {
                return Err(BacktestError::InvalidSeries {
                    reason: format!(
                        "dates must be strictly increasing ({} follows {})",
                        point.date,
                        points[i - 1].date
                    ),
                });
            }
        }

        Ok(Self {
            ticker: ticker.to_string(),
            points,
        })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.points[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.points[self.points.len() - 1].date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn new_accepts_increasing_dates() {
        let series = PriceSeries::new(
            "AAPL",
            vec![PricePoint::new(d(2), 100.0), PricePoint::new(d(3), 101.0)],
        )
        .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.ticker(), "AAPL");
        assert_eq!(series.first_date(), d(2));
        assert_eq!(series.last_date(), d(3));
        assert_eq!(series.closes(), vec![100.0, 101.0]);
    }

    #[test]
    fn new_rejects_empty() {
        let err = PriceSeries::new("AAPL", vec![]).unwrap_err();
        assert!(matches!(err, BacktestError::NoData { ticker } if ticker == "AAPL"));
    }

    #[test]
    fn new_rejects_duplicate_dates() {
        let err = PriceSeries::new(
            "AAPL",
            vec![PricePoint::new(d(2), 100.0), PricePoint::new(d(2), 101.0)],
        )
        .unwrap_err();
        assert!(matches!(err, BacktestError::InvalidSeries { .. }));
    }

    #[test]
    fn new_rejects_out_of_order_dates() {
        let err = PriceSeries::new(
            "AAPL",
            vec![PricePoint::new(d(5), 100.0), PricePoint::new(d(4), 101.0)],
        )
        .unwrap_err();
        assert!(matches!(err, BacktestError::InvalidSeries { .. }));
    }

    #[test]
    fn new_rejects_non_positive_close() {
        let err = PriceSeries::new("AAPL", vec![PricePoint::new(d(2), 0.0)]).unwrap_err();
        assert!(matches!(err, BacktestError::InvalidSeries { .. }));

        let err = PriceSeries::new("AAPL", vec![PricePoint::new(d(2), f64::NAN)]).unwrap_err();
        assert!(matches!(err, BacktestError::InvalidSeries { .. }));
    }

    #[test]
    fn gaps_between_dates_are_allowed() {
        let series = PriceSeries::new(
            "AAPL",
            vec![PricePoint::new(d(5), 100.0), PricePoint::new(d(8), 101.0)],
        )
        .unwrap();
        assert_eq!(series.dates(), vec![d(5), d(8)]);
    }
}
