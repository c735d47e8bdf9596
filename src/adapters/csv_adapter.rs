//! CSV file data adapter.
//!
//! One file per symbol, `{SYMBOL}.csv`, columns
//! `date,open,high,low,close,adj_close,volume`. The adj_close column is
//! optional; when absent it falls back to close.

use crate::domain::error::TrendbandError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvDataAdapter {
    base_path: PathBuf,
}

impl CsvDataAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{symbol}.csv"))
    }
}

fn data_err(symbol: &str, reason: impl Into<String>) -> TrendbandError {
    TrendbandError::Data {
        symbol: symbol.to_string(),
        reason: reason.into(),
    }
}

fn parse_field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    symbol: &str,
) -> Result<T, TrendbandError>
where
    T::Err: std::fmt::Display,
{
    let raw = record
        .get(index)
        .ok_or_else(|| data_err(symbol, format!("missing {name} column")))?;
    raw.parse()
        .map_err(|e| data_err(symbol, format!("invalid {name} value {raw:?}: {e}")))
}

impl DataPort for CsvDataAdapter {
    fn fetch(&self, symbol: &str) -> Result<Vec<OhlcvBar>, TrendbandError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path)
            .map_err(|e| data_err(symbol, format!("failed to read {}: {e}", path.display())))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let has_adj_close = rdr
            .headers()
            .map(|h| h.iter().any(|c| c.eq_ignore_ascii_case("adj_close")))
            .unwrap_or(false);

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| data_err(symbol, format!("CSV parse error: {e}")))?;

            let date_str = record
                .get(0)
                .ok_or_else(|| data_err(symbol, "missing date column"))?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .map_err(|e| data_err(symbol, format!("invalid date {date_str:?}: {e}")))?;

            let open: f64 = parse_field(&record, 1, "open", symbol)?;
            let high: f64 = parse_field(&record, 2, "high", symbol)?;
            let low: f64 = parse_field(&record, 3, "low", symbol)?;
            let close: f64 = parse_field(&record, 4, "close", symbol)?;
            let (adj_close, volume_col) = if has_adj_close {
                (parse_field::<f64>(&record, 5, "adj_close", symbol)?, 6)
            } else {
                (close, 5)
            };
            let volume: i64 = parse_field(&record, volume_col, "volume", symbol)?;

            bars.push(OhlcvBar {
                symbol: symbol.to_string(),
                date,
                open,
                high,
                low,
                close,
                adj_close,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TrendbandError> {
        if !self.csv_path(symbol).exists() {
            return Ok(None);
        }
        let bars = self.fetch(symbol)?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, bars.len())),
            _ => None,
        })
    }
}
