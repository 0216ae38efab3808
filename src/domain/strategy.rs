//! Strategy parameters and the end-to-end run pipeline.
//!
//! prices -> SMA(fast), SMA(slow), RSI -> signals -> backtest -> metrics.
//! Every stage produces a new series; nothing is cached between runs.

use crate::domain::backtest::{run_backtest, validate_capital, BacktestResult};
use crate::domain::error::CrosstraderError;
use crate::domain::indicator::{calculate_rsi, calculate_sma, IndicatorSeries};
use crate::domain::metrics::{Metrics, TRADING_DAYS_PER_YEAR};
use crate::domain::price::PricePoint;
use crate::domain::signal::{generate_signals, latest_signal, Signal};

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyParameters {
    pub fast_period: usize,
    pub slow_period: usize,
    pub rsi_period: usize,
    pub initial_capital: f64,
    pub position_size_pct: f64,
    /// Bars per year used to annualize the Sharpe ratio.
    pub annualization_factor: f64,
}

impl Default for StrategyParameters {
    fn default() -> Self {
        StrategyParameters {
            fast_period: 10,
            slow_period: 30,
            rsi_period: 14,
            initial_capital: 10_000.0,
            position_size_pct: 10.0,
            annualization_factor: TRADING_DAYS_PER_YEAR,
        }
    }
}

impl StrategyParameters {
    pub fn validate(&self) -> Result<(), CrosstraderError> {
        for (name, period) in [
            ("fast_period", self.fast_period),
            ("slow_period", self.slow_period),
            ("rsi_period", self.rsi_period),
        ] {
            if period == 0 {
                return Err(CrosstraderError::invalid_parameter(name, "must be at least 1"));
            }
        }
        validate_capital(self.initial_capital, self.position_size_pct)?;
        if !self.annualization_factor.is_finite() || self.annualization_factor <= 0.0 {
            return Err(CrosstraderError::invalid_parameter(
                "annualization_factor",
                format!("must be positive and finite, got {}", self.annualization_factor),
            ));
        }
        Ok(())
    }

    /// Bars needed before the first signal can fire.
    pub fn warmup_bars(&self) -> usize {
        self.fast_period.max(self.slow_period).max(self.rsi_period) + 2
    }
}

/// Output of one strategy run, including every intermediate series.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyRun {
    pub prices: Vec<PricePoint>,
    pub fast_ma: IndicatorSeries,
    pub slow_ma: IndicatorSeries,
    pub rsi: IndicatorSeries,
    pub signals: Vec<Signal>,
    pub result: BacktestResult,
    pub metrics: Metrics,
}

impl StrategyRun {
    pub fn latest_signal(&self) -> Signal {
        latest_signal(&self.signals)
    }

    pub fn latest_rsi(&self) -> Option<f64> {
        self.rsi.last_value()
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.prices.last().map(|p| p.close)
    }
}

pub fn run_strategy(
    prices: &[PricePoint],
    params: &StrategyParameters,
) -> Result<StrategyRun, CrosstraderError> {
    params.validate()?;

    let fast_ma = calculate_sma(prices, params.fast_period);
    let slow_ma = calculate_sma(prices, params.slow_period);
    let rsi = calculate_rsi(prices, params.rsi_period);
    let signals = generate_signals(prices, &fast_ma, &slow_ma, &rsi);
    let result = run_backtest(
        prices,
        &signals,
        params.initial_capital,
        params.position_size_pct,
    )?;
    let metrics = Metrics::compute(&result, params.initial_capital, params.annualization_factor);

    Ok(StrategyRun {
        prices: prices.to_vec(),
        fast_ma,
        slow_ma,
        rsi,
        signals,
        result,
        metrics,
    })
}
