#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use crosstrader::domain::error::CrosstraderError;
pub use crosstrader::domain::price::PricePoint;
use crosstrader::domain::strategy::StrategyParameters;
use crosstrader::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_prices(mut self, symbol: &str, prices: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), prices);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(&self, symbol: &str) -> Result<Vec<PricePoint>, CrosstraderError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(CrosstraderError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, CrosstraderError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Daily points starting 2024-01-01 with the given closes.
pub fn make_prices(closes: &[f64]) -> Vec<PricePoint> {
    let start = ts(2024, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint {
            timestamp: start + Duration::days(i as i64),
            open: close - 0.5,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000.0,
        })
        .collect()
}

pub fn make_params(fast: usize, slow: usize, rsi: usize) -> StrategyParameters {
    StrategyParameters {
        fast_period: fast,
        slow_period: slow,
        rsi_period: rsi,
        initial_capital: 1000.0,
        position_size_pct: 50.0,
        ..StrategyParameters::default()
    }
}

/// Closes that produce BUY@4, SELL@7, BUY@8 with SMA(2)/SMA(3)/RSI(4).
pub const ROUND_TRIP_CLOSES: [f64; 12] =
    [10.0, 9.0, 8.0, 9.0, 10.0, 12.0, 11.0, 12.0, 11.0, 10.0, 9.0, 8.0];
