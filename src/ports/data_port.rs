//! Price data access port trait.

use crate::domain::error::BacktestError;
use crate::domain::price::PricePoint;
use chrono::NaiveDate;

/// Supplier of daily closing prices.
///
/// Implementations return points for `[start_date, end_date]` sorted by
/// date with a single close per day. An empty vector means the ticker has
/// no history in range; the caller decides how to treat it.
pub trait DataPort {
    fn fetch_closes(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, BacktestError>;
}
