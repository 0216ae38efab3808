//! CSV file data adapter.
//!
//! Reads `<SYMBOL>.csv` files from a base directory. Each file has a header
//! row and the columns `timestamp,open,high,low,close,volume`.

use crate::domain::error::CrosstraderError;
use crate::domain::price::PricePoint;
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::PathBuf;

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, CrosstraderError> {
    let value = value.trim();
    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(ts);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| CrosstraderError::Data {
            reason: format!("invalid timestamp: {}", value),
        })
}

fn parse_field(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<f64, CrosstraderError> {
    let value: f64 = record
        .get(index)
        .ok_or_else(|| CrosstraderError::Data {
            reason: format!("missing {} column", name),
        })?
        .trim()
        .parse()
        .map_err(|e| CrosstraderError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })?;
    if !value.is_finite() {
        return Err(CrosstraderError::Data {
            reason: format!("invalid {} value: {} is not finite", name, value),
        });
    }
    Ok(value)
}

/// Closes drive every calculation downstream and must be strictly positive.
fn parse_close(record: &csv::StringRecord) -> Result<f64, CrosstraderError> {
    let close = parse_field(record, 4, "close")?;
    if close <= 0.0 {
        return Err(CrosstraderError::Data {
            reason: format!("invalid close value: {} must be positive", close),
        });
    }
    Ok(close)
}

/// Parse CSV content into points sorted by timestamp; duplicates are rejected.
pub fn parse_prices(content: &str) -> Result<Vec<PricePoint>, CrosstraderError> {
    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let mut prices = Vec::new();

    for result in rdr.records() {
        let record = result?;

        let ts_str = record.get(0).ok_or_else(|| CrosstraderError::Data {
            reason: "missing timestamp column".into(),
        })?;

        prices.push(PricePoint {
            timestamp: parse_timestamp(ts_str)?,
            open: parse_field(&record, 1, "open")?,
            high: parse_field(&record, 2, "high")?,
            low: parse_field(&record, 3, "low")?,
            close: parse_close(&record)?,
            volume: parse_field(&record, 5, "volume")?,
        });
    }

    prices.sort_by_key(|p| p.timestamp);
    if let Some(dup) = prices.windows(2).find(|w| w[0].timestamp == w[1].timestamp) {
        return Err(CrosstraderError::Data {
            reason: format!("duplicate timestamp {}", dup[0].timestamp),
        });
    }
    Ok(prices)
}

impl DataPort for CsvAdapter {
    fn fetch_prices(&self, symbol: &str) -> Result<Vec<PricePoint>, CrosstraderError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| CrosstraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        parse_prices(&content)
    }

    fn list_symbols(&self) -> Result<Vec<String>, CrosstraderError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| CrosstraderError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            if let Some(symbol) = name.to_str().and_then(|n| n.strip_suffix(".csv")) {
                if !symbol.is_empty() {
                    symbols.push(symbol.to_string());
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
