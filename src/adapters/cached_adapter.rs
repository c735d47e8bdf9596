//! In-memory caching wrapper around any data provider.
//!
//! `compare` runs fetch the regime reference once per traded symbol; the
//! cache collapses those into one underlying read per symbol.

use crate::domain::error::TrendbandError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::RwLock;

pub struct CachedDataAdapter<P: DataPort> {
    inner: P,
    cache: RwLock<HashMap<String, Vec<OhlcvBar>>>,
}

impl<P: DataPort> CachedDataAdapter<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn lock_poisoned() -> TrendbandError {
        TrendbandError::Io(std::io::Error::other("data cache lock poisoned"))
    }
}

impl<P: DataPort> DataPort for CachedDataAdapter<P> {
    fn fetch(&self, symbol: &str) -> Result<Vec<OhlcvBar>, TrendbandError> {
        {
            let cache = self.cache.read().map_err(|_| Self::lock_poisoned())?;
            if let Some(bars) = cache.get(symbol) {
                return Ok(bars.clone());
            }
        }

        let bars = self.inner.fetch(symbol)?;

        let mut cache = self.cache.write().map_err(|_| Self::lock_poisoned())?;
        // A racing fetch may have filled the slot; last write wins, the
        // payload is identical either way.
        cache.insert(symbol.to_string(), bars.clone());
        Ok(bars)
    }

    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TrendbandError> {
        self.inner.data_range(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingPort {
        fetches: AtomicUsize,
    }

    impl DataPort for CountingPort {
        fn fetch(&self, symbol: &str) -> Result<Vec<OhlcvBar>, TrendbandError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if symbol == "MISSING" {
                return Err(TrendbandError::Data {
                    symbol: symbol.to_string(),
                    reason: "no such file".to_string(),
                });
            }
            Ok(vec![OhlcvBar {
                symbol: symbol.to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                open: 100.0,
                high: 110.0,
                low: 95.0,
                close: 105.0,
                adj_close: 105.0,
                volume: 1000,
            }])
        }

        fn data_range(
            &self,
            _symbol: &str,
        ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TrendbandError> {
            Ok(None)
        }
    }

    #[test]
    fn second_fetch_hits_cache() {
        let adapter = CachedDataAdapter::new(CountingPort {
            fetches: AtomicUsize::new(0),
        });

        let first = adapter.fetch("SPY").unwrap();
        let second = adapter.fetch("SPY").unwrap();
        assert_eq!(first.len(), second.len());
        assert_eq!(adapter.inner.fetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cache_is_keyed_by_symbol() {
        let adapter = CachedDataAdapter::new(CountingPort {
            fetches: AtomicUsize::new(0),
        });

        adapter.fetch("SPY").unwrap();
        adapter.fetch("QQQ").unwrap();
        adapter.fetch("SPY").unwrap();
        assert_eq!(adapter.inner.fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn errors_are_not_cached() {
        let adapter = CachedDataAdapter::new(CountingPort {
            fetches: AtomicUsize::new(0),
        });

        assert!(adapter.fetch("MISSING").is_err());
        assert!(adapter.fetch("MISSING").is_err());
        assert_eq!(adapter.inner.fetches.load(Ordering::SeqCst), 2);
    }
}
