//! Configuration validation.
//!
//! Validates config fields before a run and builds [`StrategyParameters`].

use crate::domain::error::CrosstraderError;
use crate::domain::metrics::TRADING_DAYS_PER_YEAR;
use crate::domain::strategy::StrategyParameters;
use crate::ports::config_port::ConfigPort;

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    validate_period(config, "fast_period")?;
    validate_period(config, "slow_period")?;
    validate_period(config, "rsi_period")?;
    Ok(())
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    validate_initial_capital(config)?;
    validate_position_size(config)?;
    validate_annualization_factor(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> CrosstraderError {
    CrosstraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_period(config: &dyn ConfigPort, key: &str) -> Result<(), CrosstraderError> {
    config.require_string("strategy", key)?;
    let value = config.get_int("strategy", key, 0);
    if value < 1 {
        return Err(invalid(
            "strategy",
            key,
            &format!("{} must be an integer of at least 1", key),
        ));
    }
    Ok(())
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    config.require_string("backtest", "initial_capital")?;
    let value = config.get_double("backtest", "initial_capital", 0.0);
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(())
}

fn validate_position_size(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    config.require_string("backtest", "position_size_pct")?;
    let value = config.get_double("backtest", "position_size_pct", 0.0);
    if !value.is_finite() || value <= 0.0 || value > 100.0 {
        return Err(invalid(
            "backtest",
            "position_size_pct",
            "position_size_pct must be in (0, 100]",
        ));
    }
    Ok(())
}

fn validate_annualization_factor(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    let value = config.get_double("backtest", "annualization_factor", TRADING_DAYS_PER_YEAR);
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            "backtest",
            "annualization_factor",
            "annualization_factor must be positive",
        ));
    }
    Ok(())
}

/// Build parameters from a validated config.
pub fn build_parameters(config: &dyn ConfigPort) -> Result<StrategyParameters, CrosstraderError> {
    validate_strategy_config(config)?;
    validate_backtest_config(config)?;

    let params = StrategyParameters {
        fast_period: config.get_int("strategy", "fast_period", 0) as usize,
        slow_period: config.get_int("strategy", "slow_period", 0) as usize,
        rsi_period: config.get_int("strategy", "rsi_period", 0) as usize,
        initial_capital: config.get_double("backtest", "initial_capital", 0.0),
        position_size_pct: config.get_double("backtest", "position_size_pct", 0.0),
        annualization_factor: config.get_double(
            "backtest",
            "annualization_factor",
            TRADING_DAYS_PER_YEAR,
        ),
    };
    params.validate()?;
    Ok(params)
}
