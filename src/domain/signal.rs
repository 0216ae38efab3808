//! Crossover signal generation.
//!
//! A BUY fires on an upward fast/slow SMA crossover while RSI is below
//! `RSI_OVERBOUGHT`; a SELL fires on a downward crossover while RSI is above
//! `RSI_OVERSOLD`. Equality on the previous bar counts toward either direction.
//! Signals depend on market data only, never on portfolio state.

use std::fmt;

use crate::domain::indicator::IndicatorSeries;
use crate::domain::price::PricePoint;

pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Signal {
    Buy,
    Sell,
    #[default]
    Hold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
        }
    }
}

/// One signal per price point; index 0 is always HOLD.
///
/// Any undefined reading (current fast/slow/RSI, or previous fast/slow) yields
/// HOLD. Indicator series shorter than `prices` are treated as undefined past
/// their end.
pub fn generate_signals(
    prices: &[PricePoint],
    fast_ma: &IndicatorSeries,
    slow_ma: &IndicatorSeries,
    rsi: &IndicatorSeries,
) -> Vec<Signal> {
    let mut signals = Vec::with_capacity(prices.len());
    if prices.is_empty() {
        return signals;
    }
    signals.push(Signal::Hold);

    for i in 1..prices.len() {
        let readings = (
            fast_ma.get(i - 1),
            slow_ma.get(i - 1),
            fast_ma.get(i),
            slow_ma.get(i),
            rsi.get(i),
        );
        let signal = match readings {
            (Some(prev_fast), Some(prev_slow), Some(fast), Some(slow), Some(rsi)) => {
                classify(prev_fast, prev_slow, fast, slow, rsi)
            }
            _ => Signal::Hold,
        };
        signals.push(signal);
    }

    signals
}

fn classify(prev_fast: f64, prev_slow: f64, fast: f64, slow: f64, rsi: f64) -> Signal {
    if prev_fast <= prev_slow && fast > slow && rsi < RSI_OVERBOUGHT {
        Signal::Buy
    } else if prev_fast >= prev_slow && fast < slow && rsi > RSI_OVERSOLD {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

/// The most recent signal, HOLD for an empty sequence.
pub fn latest_signal(signals: &[Signal]) -> Signal {
    signals.last().copied().unwrap_or_default()
}
