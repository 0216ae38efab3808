//! Performance metrics and statistics.

use super::backtest::BacktestResult;

/// Default annualization factor for daily bars.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metrics {
    /// Percent, e.g. 15.0 for +15%.
    pub total_return_pct: f64,
    pub net_profit: f64,
    pub final_capital: f64,
    /// BUY trades executed.
    pub total_trades: usize,
    /// SELL trades executed (closed round trips).
    pub completed_trades: usize,
    pub profitable_trades: usize,
    /// Percent of SELL trades with profit > 0.
    pub win_rate: f64,
    /// Percent decline from the running equity peak.
    pub max_drawdown_pct: f64,
    pub sharpe_ratio: f64,
    /// Population standard deviation of per-step returns, as a fraction.
    pub volatility: f64,
}

impl Metrics {
    pub fn compute(result: &BacktestResult, initial_capital: f64, periods_per_year: f64) -> Self {
        let final_capital = result.final_capital;
        let net_profit = final_capital - initial_capital;
        let total_return_pct = if initial_capital > 0.0 {
            net_profit / initial_capital * 100.0
        } else {
            0.0
        };

        let total_trades = result.buy_count();
        let mut completed_trades = 0usize;
        let mut profitable_trades = 0usize;
        for trade in result.sell_trades() {
            completed_trades += 1;
            if trade.profit.unwrap_or(0.0) > 0.0 {
                profitable_trades += 1;
            }
        }

        let win_rate = if completed_trades > 0 {
            profitable_trades as f64 / completed_trades as f64 * 100.0
        } else {
            0.0
        };

        let returns = step_returns(&result.equity);
        let (mean, volatility) = mean_and_stddev(&returns);
        let sharpe_ratio = if volatility > 0.0 {
            (mean / volatility) * periods_per_year.sqrt()
        } else {
            0.0
        };

        Metrics {
            total_return_pct,
            net_profit,
            final_capital,
            total_trades,
            completed_trades,
            profitable_trades,
            win_rate,
            max_drawdown_pct: compute_max_drawdown(&result.equity),
            sharpe_ratio,
            volatility,
        }
    }
}

/// Largest percent decline from a running peak.
pub fn compute_max_drawdown(equity: &[f64]) -> f64 {
    let Some(&first) = equity.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;
    for &value in equity {
        if value > peak {
            peak = value;
        } else if peak > 0.0 {
            let dd = (peak - value) / peak * 100.0;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// `(e[i] - e[i-1]) / e[i-1]` for i >= 1; steps off a non-positive base read 0.
pub fn step_returns(equity: &[f64]) -> Vec<f64> {
    equity
        .windows(2)
        .map(|w| {
            let prev = w[0];
            if prev > 0.0 { (w[1] - prev) / prev } else { 0.0 }
        })
        .collect()
}

/// Mean and population standard deviation; (0, 0) for an empty slice.
fn mean_and_stddev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}
