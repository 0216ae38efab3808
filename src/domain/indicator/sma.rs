//! SMA (Simple Moving Average) indicator implementation.
//!
//! Arithmetic mean of `close` over the trailing window [i - n + 1, i].
//!
//! Warmup: first n - 1 bars are undefined. A period longer than the series
//! yields an all-`None` series; period 0 is treated the same way.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::price::PricePoint;

pub fn calculate_sma(prices: &[PricePoint], period: usize) -> IndicatorSeries {
    let mut series = IndicatorSeries::empty(IndicatorType::Sma(period), prices.len());
    if period == 0 || prices.len() < period {
        return series;
    }

    let mut sum: f64 = prices[..period].iter().map(|p| p.close).sum();
    series.values[period - 1] = Some(sum / period as f64);

    for i in period..prices.len() {
        sum += prices[i].close - prices[i - period].close;
        series.values[i] = Some(sum / period as f64);
    }

    series
}
