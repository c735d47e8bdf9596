//! Bar representations at each stage of the pipeline.
//!
//! `OhlcvBar` is what the data port hands back. `IndicatorBar` carries the
//! same prices plus possibly-undefined indicator values while the series is
//! being annotated. `SignalBar` is the finalized, fully-defined bar the
//! engine iterates over.

use chrono::NaiveDate;

/// Raw daily bar from a data provider.
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: i64,
}

impl OhlcvBar {
    /// Rescale OHLC by the split/dividend adjustment factor.
    pub fn adjusted(&self) -> OhlcvBar {
        let factor = if self.close != 0.0 {
            self.adj_close / self.close
        } else {
            1.0
        };
        OhlcvBar {
            symbol: self.symbol.clone(),
            date: self.date,
            open: self.open * factor,
            high: self.high * factor,
            low: self.low * factor,
            close: self.adj_close,
            adj_close: self.adj_close,
            volume: self.volume,
        }
    }
}

/// Bar annotated with indicators that may not be defined yet
/// (leading bars inside the warm-up window).
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub sma: Option<f64>,
    pub regime: Option<f64>,
}

/// Finalized bar: every indicator is defined. Immutable engine input.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub sma: f64,
    /// Regime signal: positive when the broad market is trending up,
    /// negative otherwise.
    pub regime: f64,
}
