//! Integration tests for the full pipeline.
//!
//! Tests cover:
//! - Indicator -> signal -> backtest -> metrics on hand-computed series
//! - Round trip with profit, then a position liquidated at the end
//! - Series where the RSI filter suppresses every crossover
//! - Pipeline driven through a mock data port

mod common;

use approx::assert_relative_eq;
use common::*;
use crosstrader::domain::backtest::{run_backtest, TradeKind};
use crosstrader::domain::indicator::{calculate_rsi, calculate_sma};
use crosstrader::domain::metrics::{compute_max_drawdown, Metrics};
use crosstrader::domain::signal::{generate_signals, Signal};
use crosstrader::domain::strategy::run_strategy;
use crosstrader::ports::data_port::DataPort;

mod hand_computed {
    use super::*;

    #[test]
    fn round_trip_then_liquidation() {
        let prices = make_prices(&ROUND_TRIP_CLOSES);
        let run = run_strategy(&prices, &make_params(2, 3, 4)).unwrap();

        let expected_signals: Vec<Signal> = (0..12)
            .map(|i| match i {
                4 | 8 => Signal::Buy,
                7 => Signal::Sell,
                _ => Signal::Hold,
            })
            .collect();
        assert_eq!(run.signals, expected_signals);

        let trades = &run.result.trades;
        assert_eq!(trades.len(), 3);

        assert_eq!(trades[0].kind, TradeKind::Buy);
        assert_eq!(trades[0].timestamp, prices[4].timestamp);
        assert_relative_eq!(trades[0].price, 10.0);
        assert_relative_eq!(trades[0].shares, 50.0);

        assert_eq!(trades[1].kind, TradeKind::Sell);
        assert_relative_eq!(trades[1].price, 12.0);
        assert_relative_eq!(trades[1].profit.unwrap(), 100.0);

        // 1100 capital after the sell, half re-invested at 11.
        assert_eq!(trades[2].kind, TradeKind::Buy);
        assert_relative_eq!(trades[2].shares, 50.0);

        assert_eq!(
            run.result.equity,
            vec![
                1000.0, 1000.0, 1000.0, 1000.0, 1000.0, 1100.0, 1050.0, 1100.0, 1100.0, 1050.0,
                1000.0, 950.0
            ]
        );
        // Open 50 shares liquidated at the final close of 8.
        assert_relative_eq!(run.result.final_capital, 950.0);
    }

    #[test]
    fn round_trip_metrics() {
        let prices = make_prices(&ROUND_TRIP_CLOSES);
        let run = run_strategy(&prices, &make_params(2, 3, 4)).unwrap();
        let m = &run.metrics;

        assert_relative_eq!(m.total_return_pct, -5.0, epsilon = 1e-9);
        assert_relative_eq!(m.net_profit, -50.0, epsilon = 1e-9);
        assert_eq!(m.total_trades, 2);
        assert_eq!(m.completed_trades, 1);
        assert_eq!(m.profitable_trades, 1);
        assert_relative_eq!(m.win_rate, 100.0);
        assert_relative_eq!(m.max_drawdown_pct, 150.0 / 1100.0 * 100.0, epsilon = 1e-9);
        assert!(m.volatility > 0.0);
    }

    #[test]
    fn flat_then_rising_series_is_filtered_by_rsi() {
        // A steady rise keeps RSI pinned near 100, so the upward crossover at
        // index 3 is treated as overbought; the fall drives RSI to 0 so the
        // downward crossover at index 7 is treated as oversold.
        let closes = [10.0, 10.0, 10.0, 12.0, 12.0, 14.0, 14.0, 11.0, 11.0, 9.0];
        let prices = make_prices(&closes);

        let fast = calculate_sma(&prices, 2);
        let slow = calculate_sma(&prices, 3);
        let rsi = calculate_rsi(&prices, 2);

        assert_eq!(fast.get(0), None);
        assert_relative_eq!(fast.get(3).unwrap(), 11.0);
        assert_relative_eq!(fast.get(7).unwrap(), 12.5);
        assert_eq!(slow.get(1), None);
        assert_relative_eq!(slow.get(3).unwrap(), 32.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(slow.get(7).unwrap(), 13.0, epsilon = 1e-12);

        // Flat window: a defined reading of zero.
        assert_eq!(rsi.get(2), Some(0.0));
        assert!(rsi.get(3).unwrap() > 99.9);
        assert_eq!(rsi.get(7), Some(0.0));

        let signals = generate_signals(&prices, &fast, &slow, &rsi);
        assert!(signals.iter().all(|s| *s == Signal::Hold));

        let result = run_backtest(&prices, &signals, 1000.0, 50.0).unwrap();
        assert!(result.trades.is_empty());
        assert_eq!(result.equity, vec![1000.0; 10]);
        assert_relative_eq!(result.final_capital, 1000.0);
    }

    #[test]
    fn two_round_trips_loss() {
        let closes = [10.0, 9.0, 8.0, 9.0, 10.0, 9.0, 10.0, 11.0, 10.0, 9.0, 8.0, 7.0];
        let run = run_strategy(&make_prices(&closes), &make_params(2, 3, 3)).unwrap();

        let kinds: Vec<TradeKind> = run.result.trades.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TradeKind::Buy, TradeKind::Sell, TradeKind::Buy, TradeKind::Sell]
        );
        assert_relative_eq!(run.result.trades[1].profit.unwrap(), 0.0);
        assert_relative_eq!(
            run.result.trades[3].profit.unwrap(),
            -1000.0 / 11.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(run.result.final_capital, 10_000.0 / 11.0, epsilon = 1e-9);
        assert_eq!(run.metrics.profitable_trades, 0);
        assert_eq!(run.metrics.win_rate, 0.0);
    }

    #[test]
    fn drawdown_reference_curve() {
        assert_relative_eq!(
            compute_max_drawdown(&[1000.0, 900.0, 950.0, 800.0, 1000.0]),
            20.0,
            epsilon = 1e-9
        );
    }
}

mod degenerate_input {
    use super::*;

    #[test]
    fn short_series_all_hold() {
        let prices = make_prices(&[10.0, 11.0, 12.0]);
        let run = run_strategy(&prices, &make_params(5, 10, 14)).unwrap();
        assert_eq!(run.fast_ma.valid_count(), 0);
        assert_eq!(run.rsi.valid_count(), 0);
        assert!(run.signals.iter().all(|s| *s == Signal::Hold));
        assert!(run.result.trades.is_empty());
        assert_eq!(run.result.equity.len(), 3);
    }

    #[test]
    fn single_point_noop() {
        let run = run_strategy(&make_prices(&[10.0]), &make_params(2, 3, 2)).unwrap();
        assert_eq!(run.signals, vec![Signal::Hold]);
        assert_eq!(run.result.equity, vec![1000.0]);
        assert_eq!(run.metrics.sharpe_ratio, 0.0);
        assert_eq!(run.metrics.max_drawdown_pct, 0.0);
    }
}

mod data_port_pipeline {
    use super::*;

    #[test]
    fn mock_port_feeds_strategy() {
        let port = MockDataPort::new().with_prices("BTC", make_prices(&ROUND_TRIP_CLOSES));
        let prices = port.fetch_prices("BTC").unwrap();
        let run = run_strategy(&prices, &make_params(2, 3, 4)).unwrap();
        assert_eq!(run.result.trades.len(), 3);
    }

    #[test]
    fn mock_port_data_range() {
        let port = MockDataPort::new().with_prices("ETH", make_prices(&[1.0, 2.0, 3.0]));
        let (first, last, count) = port.get_data_range("ETH").unwrap().unwrap();
        assert_eq!(first, ts(2024, 1, 1));
        assert_eq!(last, ts(2024, 1, 3));
        assert_eq!(count, 3);
        assert_eq!(port.get_data_range("NONE").unwrap(), None);
    }

    #[test]
    fn mock_port_error_propagates() {
        let port = MockDataPort::new().with_error("BAD", "corrupt file");
        let err = port.fetch_prices("BAD").unwrap_err();
        assert_eq!(err.to_string(), "data error: corrupt file");
    }

    #[test]
    fn repeated_runs_identical() {
        let prices = make_prices(&ROUND_TRIP_CLOSES);
        let params = make_params(2, 3, 4);
        let a = run_strategy(&prices, &params).unwrap();
        let b = run_strategy(&prices, &params).unwrap();
        assert_eq!(a.result, b.result);
        assert_eq!(a.metrics, b.metrics);
        assert_eq!(
            Metrics::compute(&a.result, 1000.0, 252.0),
            a.metrics
        );
    }
}
