//! Immutable per-run configuration.
//!
//! One validated value passed into the pipeline at construction. Nothing in
//! here is mutated after a run starts, so independent runs can share it
//! freely across threads.

use chrono::NaiveDate;

/// Strategy parameters consumed by the engine per bar.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyParams {
    /// Moving-average window on the traded symbol, in bars.
    pub sma_period: usize,
    /// Band width around the sma, in percent. Zero collapses both bands
    /// onto the sma itself.
    pub percent_band: f64,
    /// When enabled, a negative regime forces exit and a non-positive
    /// regime blocks entry.
    pub use_regime_filter: bool,
}

impl Default for StrategyParams {
    fn default() -> Self {
        StrategyParams {
            sma_period: 200,
            percent_band: 0.0,
            use_regime_filter: true,
        }
    }
}

/// Full configuration for one backtest run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub capital: f64,
    pub use_adjusted: bool,
    pub use_cache: bool,
    /// Broad-market reference series for the regime filter.
    pub regime_symbol: String,
    pub regime_fast: usize,
    pub regime_slow: usize,
    pub strategy: StrategyParams,
}
