//! Price source port trait.

use crate::domain::error::CrosstraderError;
use crate::domain::price::PricePoint;
use chrono::NaiveDateTime;

pub trait DataPort {
    /// Full price history for `symbol`, ascending by timestamp with no duplicates.
    fn fetch_prices(&self, symbol: &str) -> Result<Vec<PricePoint>, CrosstraderError>;

    fn list_symbols(&self) -> Result<Vec<String>, CrosstraderError>;

    /// First timestamp, last timestamp and point count, or `None` when empty.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, CrosstraderError> {
        let prices = self.fetch_prices(symbol)?;
        Ok(match (prices.first(), prices.last()) {
            (Some(first), Some(last)) => Some((first.timestamp, last.timestamp, prices.len())),
            _ => None,
        })
    }
}
