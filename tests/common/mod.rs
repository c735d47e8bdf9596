#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use std::collections::HashMap;
use trendband::domain::error::TrendbandError;
pub use trendband::domain::ohlcv::OhlcvBar;
use trendband::domain::run_config::{RunConfig, StrategyParams};
use trendband::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch(&self, symbol: &str) -> Result<Vec<OhlcvBar>, TrendbandError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TrendbandError::Data {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }

    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TrendbandError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TrendbandError::Data {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn make_bar(symbol: &str, date_str: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        symbol: symbol.to_string(),
        date: date(date_str),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        adj_close: close,
        volume: 1000,
    }
}

/// Consecutive daily bars starting at `start`, closes from the slice.
pub fn generate_bars(symbol: &str, start: &str, closes: &[f64]) -> Vec<OhlcvBar> {
    let base = date(start);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            symbol: symbol.to_string(),
            date: base + Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: (close - 1.0).max(0.01),
            close,
            adj_close: close,
            volume: 1000,
        })
        .collect()
}

pub fn sample_run_config(symbol: &str) -> RunConfig {
    RunConfig {
        symbol: symbol.to_string(),
        start_date: date("2024-01-01"),
        end_date: date("2024-12-31"),
        capital: 10_000.0,
        use_adjusted: false,
        use_cache: false,
        regime_symbol: "GSPC".to_string(),
        regime_fast: 1,
        regime_slow: 3,
        strategy: StrategyParams {
            sma_period: 3,
            percent_band: 0.0,
            use_regime_filter: true,
        },
    }
}
