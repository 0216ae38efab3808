//! Per-bar CSV report adapter.
//!
//! One row per price point: timestamp, close, both moving averages, RSI, the
//! signal and marked-to-market equity. Undefined indicator readings are left
//! as empty cells.

use crate::domain::error::CrosstraderError;
use crate::domain::strategy::StrategyRun;
use crate::ports::report_port::ReportPort;
use std::io::Write;

pub const REPORT_HEADER: [&str; 7] = [
    "timestamp",
    "close",
    "fast_ma",
    "slow_ma",
    "rsi",
    "signal",
    "equity",
];

pub struct CsvReportAdapter;

fn cell(value: Option<f64>) -> String {
    value.map(|v| format!("{:.6}", v)).unwrap_or_default()
}

/// Write the report for `run` to any writer.
pub fn write_report<W: Write>(run: &StrategyRun, writer: W) -> Result<(), CrosstraderError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(REPORT_HEADER)?;

    for (i, point) in run.prices.iter().enumerate() {
        let signal = run.signals.get(i).copied().unwrap_or_default();
        wtr.write_record([
            point.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{:.6}", point.close),
            cell(run.fast_ma.get(i)),
            cell(run.slow_ma.get(i)),
            cell(run.rsi.get(i)),
            signal.to_string(),
            cell(run.result.equity.get(i).copied()),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, run: &StrategyRun, output_path: &str) -> Result<(), CrosstraderError> {
        let file = std::fs::File::create(output_path)?;
        write_report(run, file)
    }
}
