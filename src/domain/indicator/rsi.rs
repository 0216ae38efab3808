//! RSI (Relative Strength Index) indicator implementation.
//!
//! Windowed (non-smoothed) averages over the last n close-to-close changes:
//! - gain = sum of positive changes, loss = sum of |negative changes|
//! - avg_gain = gain / n, avg_loss = loss / n (floored to `RSI_LOSS_FLOOR`)
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//!
//! Warmup: first n bars are undefined (need n price changes).

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::price::PricePoint;

/// Substituted for a zero average loss so a pure uptrend reads just under 100.
pub const RSI_LOSS_FLOOR: f64 = 1e-4;

pub fn calculate_rsi(prices: &[PricePoint], period: usize) -> IndicatorSeries {
    let mut series = IndicatorSeries::empty(IndicatorType::Rsi(period), prices.len());
    if period == 0 || prices.len() <= period {
        return series;
    }

    for i in period..prices.len() {
        let (gain, loss) = prices[i + 1 - period..=i]
            .iter()
            .zip(&prices[i - period..i])
            .map(|(curr, prev)| curr.change_from(prev))
            .fold((0.0, 0.0), |(gain, loss), change| {
                if change > 0.0 {
                    (gain + change, loss)
                } else {
                    (gain, loss - change)
                }
            });

        let avg_gain = gain / period as f64;
        let mut avg_loss = loss / period as f64;
        if avg_loss == 0.0 {
            avg_loss = RSI_LOSS_FLOOR;
        }

        let rs = avg_gain / avg_loss;
        series.values[i] = Some(100.0 - (100.0 / (1.0 + rs)));
    }

    series
}
