//! Time-series provider port trait.

use crate::domain::error::TrendbandError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

/// Supplies the full available OHLC history for a symbol, date-ordered.
/// Period trimming and price adjustment happen in the domain, after fetch.
///
/// `Send + Sync` so one provider (typically the caching wrapper) can be
/// shared across parallel runs.
pub trait DataPort: Send + Sync {
    fn fetch(&self, symbol: &str) -> Result<Vec<OhlcvBar>, TrendbandError>;

    /// First date, last date, and bar count for a symbol, if any data exists.
    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TrendbandError>;
}
