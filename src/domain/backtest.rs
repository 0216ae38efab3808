//! Single-asset backtest simulator.
//!
//! The run is a fold over bar indices 1..N threading a [`SimulationState`]
//! forward. The state machine has two states, FLAT (`shares == 0`) and LONG
//! (`shares > 0`):
//!
//! - FLAT + BUY: invest `capital * pct / 100` at the bar close.
//! - LONG + SELL: sell every share at the bar close and book the profit.
//! - anything else: no change.
//!
//! Equity is marked to market after every bar. A position still open after the
//! last bar is liquidated at the final close; that only affects
//! `final_capital`, the equity curve is not extended.

use chrono::NaiveDateTime;

use crate::domain::error::CrosstraderError;
use crate::domain::price::PricePoint;
use crate::domain::signal::Signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum TradeKind {
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trade {
    pub kind: TradeKind,
    pub price: f64,
    pub timestamp: NaiveDateTime,
    pub shares: f64,
    /// Realized profit; only set on SELL trades.
    pub profit: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BacktestResult {
    pub trades: Vec<Trade>,
    /// One entry per price point; `equity[0]` is the initial capital.
    pub equity: Vec<f64>,
    pub final_capital: f64,
}

impl BacktestResult {
    pub fn buy_count(&self) -> usize {
        self.trades
            .iter()
            .filter(|t| t.kind == TradeKind::Buy)
            .count()
    }

    pub fn sell_trades(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter().filter(|t| t.kind == TradeKind::Sell)
    }
}

/// Simulation state threaded through the fold.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub capital: f64,
    pub shares: f64,
    pub trades: Vec<Trade>,
    pub equity: Vec<f64>,
}

impl SimulationState {
    pub fn new(initial_capital: f64, capacity: usize) -> Self {
        let mut equity = Vec::with_capacity(capacity.max(1));
        equity.push(initial_capital);
        SimulationState {
            capital: initial_capital,
            shares: 0.0,
            trades: Vec::new(),
            equity,
        }
    }

    pub fn is_long(&self) -> bool {
        self.shares > 0.0
    }

    /// Apply one bar: act on the signal, then mark equity to market.
    pub fn step(mut self, point: &PricePoint, signal: Signal, position_size_pct: f64) -> Self {
        let price = point.close;
        match signal {
            Signal::Buy if !self.is_long() => {
                let invest = self.capital * (position_size_pct / 100.0);
                self.shares = invest / price;
                self.capital -= invest;
                self.trades.push(Trade {
                    kind: TradeKind::Buy,
                    price,
                    timestamp: point.timestamp,
                    shares: self.shares,
                    profit: None,
                });
            }
            Signal::Sell if self.is_long() => {
                let proceeds = self.shares * price;
                self.capital += proceeds;
                let profit = proceeds - self.entry_cost();
                self.trades.push(Trade {
                    kind: TradeKind::Sell,
                    price,
                    timestamp: point.timestamp,
                    shares: self.shares,
                    profit: Some(profit),
                });
                self.shares = 0.0;
            }
            _ => {}
        }
        self.equity.push(self.capital + self.shares * price);
        self
    }

    /// Cost basis of the open position, taken from the most recent BUY.
    ///
    /// Correct only while at most one position is open at a time; pyramiding
    /// into several buys would misattribute profit here.
    fn entry_cost(&self) -> f64 {
        self.trades
            .iter()
            .rev()
            .find(|t| t.kind == TradeKind::Buy)
            .map(|t| t.shares * t.price)
            .unwrap_or(0.0)
    }

    fn finish(mut self, last_close: Option<f64>) -> BacktestResult {
        if self.is_long() {
            if let Some(close) = last_close {
                self.capital += self.shares * close;
                self.shares = 0.0;
            }
        }
        BacktestResult {
            trades: self.trades,
            equity: self.equity,
            final_capital: self.capital,
        }
    }
}

pub fn validate_capital(
    initial_capital: f64,
    position_size_pct: f64,
) -> Result<(), CrosstraderError> {
    if !initial_capital.is_finite() || initial_capital <= 0.0 {
        return Err(CrosstraderError::invalid_parameter(
            "initial_capital",
            format!("must be positive and finite, got {}", initial_capital),
        ));
    }
    if !position_size_pct.is_finite() || position_size_pct <= 0.0 || position_size_pct > 100.0 {
        return Err(CrosstraderError::invalid_parameter(
            "position_size_pct",
            format!("must be in (0, 100], got {}", position_size_pct),
        ));
    }
    Ok(())
}

/// Run the simulation over `prices` driven by `signals`.
///
/// Fewer than two price points is a no-op: `equity == [initial_capital]` and
/// `final_capital == initial_capital`. Missing trailing signals count as HOLD.
/// Prices are assumed positive.
pub fn run_backtest(
    prices: &[PricePoint],
    signals: &[Signal],
    initial_capital: f64,
    position_size_pct: f64,
) -> Result<BacktestResult, CrosstraderError> {
    validate_capital(initial_capital, position_size_pct)?;

    let state = SimulationState::new(initial_capital, prices.len());
    if prices.len() < 2 {
        return Ok(state.finish(None));
    }

    let state = prices
        .iter()
        .enumerate()
        .skip(1)
        .fold(state, |state, (i, point)| {
            let signal = signals.get(i).copied().unwrap_or_default();
            state.step(point, signal, position_size_pct)
        });

    Ok(state.finish(prices.last().map(|p| p.close)))
}
