//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{
    build_parameters, validate_backtest_config, validate_strategy_config,
};
use crate::domain::error::CrosstraderError;
use crate::domain::strategy::{run_strategy, StrategyParameters, StrategyRun};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "crosstrader", about = "SMA crossover + RSI backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the data range for a symbol
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            symbol,
            output,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config, symbol.as_deref())
            } else {
                run_backtest(&config, symbol.as_deref(), output.as_ref())
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
    }
}

fn fail(err: &CrosstraderError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| fail(&e))
}

pub fn data_adapter(config: &dyn ConfigPort) -> CsvAdapter {
    let path = config
        .get_string("data", "path")
        .unwrap_or_else(|| "data".to_string());
    CsvAdapter::new(PathBuf::from(path))
}

pub fn resolve_symbol(
    symbol_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<String, CrosstraderError> {
    symbol_override
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .map(Ok)
        .unwrap_or_else(|| {
            config
                .require_string("data", "symbol")
                .map(|s| s.to_uppercase())
        })
}

fn warn_on_parameters(params: &StrategyParameters) {
    if params.fast_period >= params.slow_period {
        eprintln!(
            "warning: fast_period ({}) is not shorter than slow_period ({})",
            params.fast_period, params.slow_period
        );
    }
}

fn run_backtest(
    config_path: &PathBuf,
    symbol_override: Option<&str>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let params = match build_parameters(&adapter) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };
    warn_on_parameters(&params);

    let symbol = match resolve_symbol(symbol_override, &adapter) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    let output = output_path
        .cloned()
        .or_else(|| adapter.get_string("report", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("report.csv"));

    let data_port = data_adapter(&adapter);
    run_backtest_pipeline(&data_port, &CsvReportAdapter, &params, &symbol, &output)
}

/// Fetch, run and report. Separated from config loading so it can be driven
/// by any data and report port.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    params: &StrategyParameters,
    symbol: &str,
    output: &PathBuf,
) -> ExitCode {
    let prices = match data_port.fetch_prices(symbol) {
        Ok(p) if p.is_empty() => {
            return fail(&CrosstraderError::NoData {
                symbol: symbol.to_string(),
            });
        }
        Ok(p) => p,
        Err(e) => return fail(&e),
    };

    if prices.len() < params.warmup_bars() {
        eprintln!(
            "warning: {} has {} bars, fewer than the {} needed for a signal",
            symbol,
            prices.len(),
            params.warmup_bars()
        );
    }

    eprintln!(
        "Running backtest: {} ({} bars), SMA({}) / SMA({}), RSI({})",
        symbol,
        prices.len(),
        params.fast_period,
        params.slow_period,
        params.rsi_period
    );

    let run = match run_strategy(&prices, params) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    print_summary(&run, params);

    let output_str = output.display().to_string();
    match report_port.write(&run, &output_str) {
        Ok(()) => {
            eprintln!("\nReport written to: {}", output_str);
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

pub fn print_summary(run: &StrategyRun, params: &StrategyParameters) {
    let m = &run.metrics;
    eprintln!("\n=== Performance ===");
    eprintln!("Total Return:      {:.2}%", m.total_return_pct);
    eprintln!("Final Capital:     ${:.2}", m.final_capital);
    eprintln!("Net Profit/Loss:   ${:.2}", m.net_profit);
    eprintln!(
        "Sharpe Ratio:      {:.2} (x sqrt({}))",
        m.sharpe_ratio, params.annualization_factor
    );

    eprintln!("\n=== Trades ===");
    eprintln!("Total Trades:      {}", m.total_trades);
    eprintln!("Completed Trades:  {}", m.completed_trades);
    eprintln!("Profitable Trades: {}", m.profitable_trades);
    eprintln!("Win Rate:          {:.2}%", m.win_rate);

    eprintln!("\n=== Risk ===");
    eprintln!("Max Drawdown:      {:.2}%", m.max_drawdown_pct);
    eprintln!("Volatility:        {:.2}%", m.volatility * 100.0);
    match run.latest_rsi() {
        Some(rsi) => eprintln!("Current RSI:       {:.2}", rsi),
        None => eprintln!("Current RSI:       N/A"),
    }

    eprintln!("\n=== Current Signal ===");
    eprintln!("Signal:            {}", run.latest_signal());
    if let Some(close) = run.latest_close() {
        eprintln!("Current Price:     ${:.2}", close);
    }
}

pub fn run_dry_run(config_path: &PathBuf, symbol_override: Option<&str>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let params = match build_parameters(&adapter) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };
    eprintln!("Config validated successfully");
    warn_on_parameters(&params);

    eprintln!("\nStrategy:");
    eprintln!("  fast: SMA({})", params.fast_period);
    eprintln!("  slow: SMA({})", params.slow_period);
    eprintln!("  rsi:  RSI({})", params.rsi_period);
    eprintln!("  warmup bars: {}", params.warmup_bars());

    eprintln!("\nBacktest:");
    eprintln!("  initial capital:      {:.2}", params.initial_capital);
    eprintln!("  position size:        {}%", params.position_size_pct);
    eprintln!("  annualization factor: {}", params.annualization_factor);

    match resolve_symbol(symbol_override, &adapter) {
        Ok(symbol) => eprintln!("\nSymbol: {}", symbol),
        Err(e) => return fail(&e),
    }

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_strategy_config(&adapter) {
        return fail(&e);
    }
    if let Err(e) = validate_backtest_config(&adapter) {
        return fail(&e);
    }

    eprintln!("Configuration is valid.");
    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let symbols = match data_adapter(&config).list_symbols() {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    if symbols.is_empty() {
        eprintln!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}

fn run_info(config_path: &PathBuf, symbol_override: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let symbol = match resolve_symbol(symbol_override, &config) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    match data_adapter(&config).get_data_range(&symbol) {
        Ok(Some((first, last, count))) => {
            println!("{}: {} bars, {} to {}", symbol, count, first, last);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{}: no data found", symbol);
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}
